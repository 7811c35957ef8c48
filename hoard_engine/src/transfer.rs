//! Cross-container item movement.
//!
//! Every transfer is remove-then-add with the checks run up front, so a
//! refused attempt leaves both containers exactly as they were and fires no
//! hooks. Refusals surface as notices; theft attempts also land in the
//! crime ledger.

use crate::character::Character;
use crate::container::Container;
use crate::crime::CrimeLog;
use crate::inventory::LoadContext;
use crate::item::{Item, ItemKind};
use crate::notice::{Notice, NoticeLog};
use crate::party::Party;
use crate::pile::Pile;
use crate::rule::RuleContext;
use crate::slot::{BagKind, EquipSlot};

/// Move one stack (or one unit of it) from `source` into `target`.
///
/// Refused when the goods would land in player hands while someone else's
/// claim is on them, or when `target` cannot carry them. Returns whether
/// the goods moved.
pub fn put_item_down(
    source: &mut dyn Container,
    from: BagKind,
    slot: u32,
    whole_stack: bool,
    target: &mut dyn Container,
    to: BagKind,
    notices: &mut NoticeLog,
    crimes: &mut CrimeLog,
) -> bool {
    let Some(occupant) = source.inventory().bag(from).get(slot) else {
        return false;
    };
    if target.player_controlled() && !occupant.owner.is_empty() && !target.claims(&occupant.owner)
    {
        crimes.report_theft(&source.display_name(), occupant);
        notices.push(Notice::TheftRefused {
            actor: source.display_name(),
            item: occupant.name.clone(),
        });
        return false;
    }
    if refuse_for_capacity(target, occupant, whole_stack, notices) {
        return false;
    }
    let Some(item) = source.remove_item(from, slot, whole_stack) else {
        return false;
    };
    let name = item.name.clone();
    target.add_item(to, item, None, LoadContext::Live);
    notices.push(Notice::Dropped {
        actor: source.display_name(),
        item: name,
    });
    true
}

/// Have the named party member take a stack (or one unit) out of `source`.
///
/// The item's pickup rule is judged against the member's stats. Pooled
/// categories taken by a player-controlled member fold into the party's
/// counters; everything else lands in the member's backpack.
pub fn pick_item_up(
    party: &mut Party,
    member_id: &str,
    source: &mut dyn Container,
    from: BagKind,
    slot: u32,
    whole_stack: bool,
    notices: &mut NoticeLog,
    crimes: &mut CrimeLog,
) -> bool {
    let Some(occupant) = source.inventory().bag(from).get(slot) else {
        return false;
    };
    let Some(member) = party.member(member_id) else {
        return false;
    };
    let ctx = RuleContext {
        item: occupant,
        slot: None,
        stats: &member.stats,
    };
    if !occupant.pickup_rule.passes(&ctx) {
        notices.push(Notice::CouldNotCarry {
            actor: member.name.clone(),
            item: occupant.name.clone(),
            reason: format!("{} cannot pick up {}", member.name, occupant.name),
        });
        return false;
    }
    if member.player_controlled
        && !occupant.owner.is_empty()
        && !Container::claims(member, &occupant.owner)
    {
        crimes.report_theft(&member.id, occupant);
        notices.push(Notice::TheftRefused {
            actor: member.name.clone(),
            item: occupant.name.clone(),
        });
        return false;
    }
    let pooled = occupant.is_group_held() && member.player_controlled;
    let member_name = member.name.clone();
    let refused = if pooled {
        refuse_for_capacity(party, occupant, whole_stack, notices)
    } else {
        refuse_for_capacity(member, occupant, whole_stack, notices)
    };
    if refused {
        return false;
    }
    let Some(item) = source.remove_item(from, slot, whole_stack) else {
        return false;
    };
    let item_name = item.name.clone();
    let stack = item.stack_size.max(1);
    if pooled {
        party.add_item(BagKind::Backpack, item, None, LoadContext::Live);
    } else {
        let Some(member) = party.member_mut(member_id) else {
            return false;
        };
        member.add_item(BagKind::Backpack, item, None, LoadContext::Live);
    }
    notices.push(Notice::PickedUp {
        actor: member_name,
        item: item_name,
        stack,
    });
    true
}

/// Hand a stack (or one unit) from one character to another's backpack.
///
/// Equipped goods honor the combat lock on their way off the giver. The
/// receiver's claim rules apply the same as any other placement into
/// player hands.
pub fn give_item(
    giver: &mut Character,
    from: BagKind,
    slot: u32,
    whole_stack: bool,
    receiver: &mut Character,
    notices: &mut NoticeLog,
    crimes: &mut CrimeLog,
) -> bool {
    let Some(occupant) = giver.inventory().bag(from).get(slot) else {
        return false;
    };
    if from == BagKind::Equipped {
        let check = giver.can_unequip(occupant);
        if check.is_denied() {
            notices.push(Notice::CouldNotCarry {
                actor: giver.name.clone(),
                item: occupant.name.clone(),
                reason: check.message.unwrap_or_default(),
            });
            return false;
        }
    }
    if receiver.player_controlled
        && !occupant.owner.is_empty()
        && !Container::claims(receiver, &occupant.owner)
    {
        crimes.report_theft(&giver.id, occupant);
        notices.push(Notice::TheftRefused {
            actor: receiver.name.clone(),
            item: occupant.name.clone(),
        });
        return false;
    }
    if refuse_for_capacity(receiver, occupant, whole_stack, notices) {
        return false;
    }
    let Some(item) = giver.remove_item(from, slot, whole_stack) else {
        return false;
    };
    let item_name = item.name.clone();
    let stack = item.stack_size.max(1);
    receiver.add_item(BagKind::Backpack, item, None, LoadContext::Live);
    notices.push(Notice::Received {
        actor: receiver.name.clone(),
        item: item_name,
        stack,
    });
    true
}

/// Move every stack in one bag into another container's bag. Returns the
/// number of stacks moved. Infinite stacks contribute a single unit and
/// stay put.
pub fn move_all_items(
    source: &mut dyn Container,
    from: BagKind,
    target: &mut dyn Container,
    to: BagKind,
) -> usize {
    let slots: Vec<u32> = source.inventory().bag(from).iter().map(|(slot, _)| slot).collect();
    let mut moved = 0;
    for slot in slots {
        if let Some(item) = source.remove_item(from, slot, true) {
            target.add_item(to, item, None, LoadContext::Live);
            moved += 1;
        }
    }
    moved
}

/// Empty every carried bag into the target's backpack: equipped gear comes
/// off first, then quick-use slots, then the backpack itself.
pub fn move_everything(source: &mut dyn Container, target: &mut dyn Container) -> usize {
    let mut moved = 0;
    for kind in [BagKind::Equipped, BagKind::QuickUse, BagKind::Backpack] {
        moved += move_all_items(source, kind, target, BagKind::Backpack);
    }
    moved
}

/// Clone every stack in one bag into another container's bag, keeping slot
/// positions and owners. Occupants of colliding target slots are displaced
/// and dropped.
pub fn copy_all_items(
    source: &dyn Container,
    from: BagKind,
    target: &mut dyn Container,
    to: BagKind,
) -> usize {
    let copies: Vec<(u32, Item)> = source
        .inventory()
        .bag(from)
        .iter()
        .map(|(slot, item)| (slot, item.clone()))
        .collect();
    let copied = copies.len();
    for (slot, item) in copies {
        target.add_item(to, item, Some(slot), LoadContext::Live);
    }
    copied
}

/// Spill everything a character carries onto the ground as a fresh pile.
pub fn drop_everything(character: &mut Character, pile_id: &str) -> Pile {
    let mut pile = Pile::new(pile_id);
    move_everything(character, &mut pile);
    pile
}

/// Disarm: take the weapons out of both hands, leaving shields and
/// everything else equipped. Returns what was dropped.
pub fn drop_equipped_weapons(character: &mut Character) -> Vec<Item> {
    let mut dropped = Vec::new();
    for slot in EquipSlot::HAND_SLOTS {
        let armed = character
            .equipped(slot)
            .is_some_and(|item| matches!(item.kind, ItemKind::Weapon { .. }));
        if armed {
            if let Some(item) = character.remove_item(BagKind::Equipped, slot.index(), true) {
                dropped.push(item);
            }
        }
    }
    dropped
}

/// Shared capacity refusal: checks how much the target will take against
/// how much is actually moving and pushes a notice when it falls short.
fn refuse_for_capacity(
    target: &dyn Container,
    occupant: &Item,
    whole_stack: bool,
    notices: &mut NoticeLog,
) -> bool {
    let moving = if whole_stack {
        occupant.stack_size.max(1)
    } else {
        1
    };
    let check = target.can_add_item(occupant);
    if check.is_denied() || check.allowed < moving {
        notices.push(Notice::CouldNotCarry {
            actor: target.display_name(),
            item: occupant.name.clone(),
            reason: check.message.unwrap_or_else(|| {
                format!("{} cannot hold {}", target.display_name(), occupant.name)
            }),
        });
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owner::Owner;
    use crate::rule::{EquipPred, EquipRule};

    fn create_test_item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: "A test item".into(),
            weight_grams: 100,
            ..Item::default()
        }
    }

    fn create_test_party() -> Party {
        let mut party = Party::new();
        let mut vesna = Character::new("vesna", "Vesna", "wanderers");
        vesna.player_controlled = true;
        party.add_member(vesna);
        party
    }

    #[test]
    fn taking_claimed_goods_is_refused_and_reported() {
        let mut party = create_test_party();
        let mut pile = Pile::new("pile-1");
        let mut cup = create_test_item("silver_cup");
        cup.owner = Owner::of_character("mirek");
        pile.drop_item(cup);
        let mut notices = NoticeLog::new();
        let mut crimes = CrimeLog::default();

        let taken = pick_item_up(
            &mut party,
            "vesna",
            &mut pile,
            BagKind::Backpack,
            0,
            true,
            &mut notices,
            &mut crimes,
        );

        assert!(!taken);
        assert_eq!(pile.total_items(), 1);
        assert_eq!(party.member("vesna").unwrap().total_items(), 0);
        assert_eq!(crimes.reports().len(), 1);
        assert_eq!(crimes.reports()[0].offender, "vesna");
        assert!(notices.iter().any(|n| matches!(n, Notice::TheftRefused { .. })));
    }

    #[test]
    fn unclaimed_goods_come_along_freely() {
        let mut party = create_test_party();
        let mut pile = Pile::new("pile-1");
        pile.drop_item(create_test_item("lantern"));
        let mut notices = NoticeLog::new();
        let mut crimes = CrimeLog::default();

        let taken = pick_item_up(
            &mut party,
            "vesna",
            &mut pile,
            BagKind::Backpack,
            0,
            true,
            &mut notices,
            &mut crimes,
        );

        assert!(taken);
        assert!(crimes.is_empty());
        assert_eq!(party.member("vesna").unwrap().total_items(), 1);
        assert!(pile.should_collapse());
    }

    #[test]
    fn pickup_rules_judge_the_member() {
        let mut party = create_test_party();
        let mut pile = Pile::new("pile-1");
        let mut relic = create_test_item("relic");
        relic.pickup_rule = EquipRule::Pred(EquipPred::MinLevel { level: 5 });
        pile.drop_item(relic);
        let mut notices = NoticeLog::new();
        let mut crimes = CrimeLog::default();

        let taken = pick_item_up(
            &mut party,
            "vesna",
            &mut pile,
            BagKind::Backpack,
            0,
            true,
            &mut notices,
            &mut crimes,
        );

        assert!(!taken);
        assert!(crimes.is_empty());
        assert!(notices.iter().any(|n| matches!(n, Notice::CouldNotCarry { .. })));
        assert_eq!(pile.total_items(), 1);
    }

    #[test]
    fn pooled_pickups_fold_into_party_counters() {
        let mut party = create_test_party();
        let mut pile = Pile::new("pile-1");
        let mut gold = create_test_item("gold");
        gold.kind = ItemKind::Currency;
        gold.max_stack = 1_000;
        gold.stack_size = 50;
        pile.drop_item(gold);
        let mut notices = NoticeLog::new();
        let mut crimes = CrimeLog::default();

        let taken = pick_item_up(
            &mut party,
            "vesna",
            &mut pile,
            BagKind::Backpack,
            0,
            true,
            &mut notices,
            &mut crimes,
        );

        assert!(taken);
        assert_eq!(party.gold(), 50);
        assert_eq!(party.member("vesna").unwrap().total_items(), 0);
        assert_eq!(party.inventory().bag(BagKind::Backpack).len(), 0);
    }

    #[test]
    fn single_units_leave_the_remainder_behind() {
        let mut party = create_test_party();
        let mut pile = Pile::new("pile-1");
        let mut arrows = create_test_item("arrow");
        arrows.max_stack = 20;
        arrows.stack_size = 5;
        pile.drop_item(arrows);
        let mut notices = NoticeLog::new();
        let mut crimes = CrimeLog::default();

        pick_item_up(
            &mut party,
            "vesna",
            &mut pile,
            BagKind::Backpack,
            0,
            false,
            &mut notices,
            &mut crimes,
        );

        let remainder = pile.inventory().bag(BagKind::Backpack).get(0).unwrap();
        assert_eq!(remainder.stack_size, 4);
        let member = party.member("vesna").unwrap();
        let (_, _, taken) = member.find_item("arrow").unwrap();
        assert_eq!(taken.stack_size, 1);
    }

    #[test]
    fn putting_down_moves_the_stack_and_notices() {
        let mut vesna = Character::new("vesna", "Vesna", "wanderers");
        vesna.add_item(
            BagKind::Backpack,
            create_test_item("lantern"),
            None,
            LoadContext::Live,
        );
        let mut pile = Pile::new("pile-1");
        let mut notices = NoticeLog::new();
        let mut crimes = CrimeLog::default();

        let dropped = put_item_down(
            &mut vesna,
            BagKind::Backpack,
            0,
            true,
            &mut pile,
            BagKind::Backpack,
            &mut notices,
            &mut crimes,
        );

        assert!(dropped);
        assert_eq!(vesna.total_items(), 0);
        assert_eq!(pile.total_items(), 1);
        assert!(notices.iter().any(|n| matches!(n, Notice::Dropped { .. })));
    }

    #[test]
    fn giving_claimed_goods_to_an_npc_is_allowed() {
        let mut vesna = Character::new("vesna", "Vesna", "wanderers");
        let mut cup = create_test_item("silver_cup");
        cup.owner = Owner::of_character("dalibor");
        vesna.add_item(BagKind::Backpack, cup, None, LoadContext::Live);
        let mut mirek = Character::new("mirek", "Mirek", "guild");
        let mut notices = NoticeLog::new();
        let mut crimes = CrimeLog::default();

        let given = give_item(
            &mut vesna,
            BagKind::Backpack,
            0,
            true,
            &mut mirek,
            &mut notices,
            &mut crimes,
        );

        assert!(given);
        assert!(crimes.is_empty());
        assert_eq!(mirek.total_items(), 1);
        assert!(notices.iter().any(|n| matches!(n, Notice::Received { .. })));
    }

    #[test]
    fn move_everything_conserves_units_and_reverses_equip_effects() {
        let mut vesna = Character::new("vesna", "Vesna", "wanderers");
        let mut sword = create_test_item("sword");
        sword.kind = ItemKind::Weapon { two_handed: false };
        vesna.add_item(
            BagKind::Equipped,
            sword,
            Some(EquipSlot::RightHand.index()),
            LoadContext::Live,
        );
        let mut potion = create_test_item("potion");
        potion.kind = ItemKind::Usable;
        vesna.add_item(BagKind::QuickUse, potion, None, LoadContext::Live);
        let mut arrows = create_test_item("arrow");
        arrows.max_stack = 20;
        arrows.stack_size = 7;
        vesna.add_item(BagKind::Backpack, arrows, None, LoadContext::Live);
        assert!(vesna.stats.load_grams() > 0);

        let mut pile = Pile::new("pile-1");
        let moved = move_everything(&mut vesna, &mut pile);

        assert_eq!(moved, 3);
        assert_eq!(vesna.total_items(), 0);
        assert_eq!(vesna.stats.load_grams(), 0);
        assert_eq!(pile.inventory().bag(BagKind::Backpack).total_units(), 9);
        assert!(!pile.should_collapse());
    }

    #[test]
    fn copies_keep_slots_and_leave_the_source_alone() {
        let mut vesna = Character::new("vesna", "Vesna", "wanderers");
        vesna.add_item(
            BagKind::Backpack,
            create_test_item("lantern"),
            Some(4),
            LoadContext::Live,
        );
        let mut stall = Character::new("mirek", "Mirek", "guild");

        let copied = copy_all_items(&vesna, BagKind::Backpack, &mut stall, BagKind::Merchant);

        assert_eq!(copied, 1);
        assert_eq!(vesna.total_items(), 1);
        let stocked = stall.inventory().bag(BagKind::Merchant).get(4).unwrap();
        assert_eq!(stocked.id, "lantern");
    }

    #[test]
    fn disarming_leaves_the_shield() {
        let mut vesna = Character::new("vesna", "Vesna", "wanderers");
        let mut sword = create_test_item("sword");
        sword.kind = ItemKind::Weapon { two_handed: false };
        vesna.add_item(
            BagKind::Equipped,
            sword,
            Some(EquipSlot::RightHand.index()),
            LoadContext::Live,
        );
        let mut buckler = create_test_item("buckler");
        buckler.kind = ItemKind::Shield;
        vesna.add_item(
            BagKind::Equipped,
            buckler,
            Some(EquipSlot::LeftHand.index()),
            LoadContext::Live,
        );

        let dropped = drop_equipped_weapons(&mut vesna);

        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, "sword");
        assert!(vesna.equipped(EquipSlot::LeftHand).is_some());
        assert!(vesna.equipped(EquipSlot::RightHand).is_none());
    }

    #[test]
    fn dropping_everything_builds_a_pile() {
        let mut vesna = Character::new("vesna", "Vesna", "wanderers");
        vesna.add_item(
            BagKind::Backpack,
            create_test_item("lantern"),
            None,
            LoadContext::Live,
        );
        vesna.add_item(
            BagKind::Backpack,
            create_test_item("rope"),
            None,
            LoadContext::Live,
        );

        let pile = drop_everything(&mut vesna, "vesna-remains");

        assert_eq!(vesna.total_items(), 0);
        assert_eq!(pile.total_items(), 2);
        assert_eq!(pile.id, "vesna-remains");
    }
}
