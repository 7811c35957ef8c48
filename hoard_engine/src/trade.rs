//! Trading between the party and merchant characters.
//!
//! Prices start from an item's base cost and scale by the trader's
//! disposition towards the customer, tilted by whichever side has the
//! better persuasion. The same formula prices both directions; only the
//! multiplier table differs between buying and selling.

use thiserror::Error;

use crate::character::Character;
use crate::container::Container;
use crate::inventory::{Bag, LoadContext};
use crate::item::Item;
use crate::loader::trade::TradeConfig;
use crate::notice::{Notice, NoticeLog};
use crate::party::Party;
use crate::slot::BagKind;
use crate::stats::Skill;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TradeError {
    #[error("{buyer} cannot afford {cost} gold for {item}")]
    CannotAfford {
        buyer: String,
        item: String,
        cost: u64,
    },
    #[error("{0}")]
    Refused(String),
}

/// Price one stack for a transaction between `customer` and `trader`.
///
/// With either party unknown the stack trades at its raw cost. Otherwise
/// the disposition tier picks a multiplier, each rank of persuasion
/// advantage shifts it by the configured step, and the result is floored
/// so nothing ever trades for nothing.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn trading_cost(
    item: &Item,
    customer: Option<&Character>,
    trader: Option<&Character>,
    customer_buying: bool,
    config: &TradeConfig,
) -> u64 {
    let raw = item.stack_cost();
    let (Some(customer), Some(trader)) = (customer, trader) else {
        return raw;
    };
    let disposition = trader.disposition_towards(customer);
    let (buying, selling) = config.multipliers(disposition);
    let advantage = trader.stats.skill_rank(Skill::Persuasion)
        - customer.stats.skill_rank(Skill::Persuasion);
    let shift = config.persuasion_step * advantage as f32;
    let multiplier = if customer_buying {
        buying + shift
    } else {
        selling - shift
    };
    let multiplier = multiplier.max(config.minimum_multiplier);
    (raw as f64 * f64::from(multiplier)).ceil() as u64
}

/// Price every stack in a bag at once, as for a buyout offer.
pub fn total_trading_cost(
    bag: &Bag,
    customer: Option<&Character>,
    trader: Option<&Character>,
    customer_buying: bool,
    config: &TradeConfig,
) -> u64 {
    bag.iter()
        .map(|(_, item)| trading_cost(item, customer, trader, customer_buying, config))
        .sum()
}

/// Buy from `trader`'s stock on behalf of the named party member.
///
/// The goods move into the shared backpack and the price comes out of the
/// party's gold. Ownership is stripped from the goods unless the party
/// already claims them or the claim is fixed. Partial purchases are not a
/// thing: if the party cannot carry the whole stack the sale is refused.
/// A completed purchase lands a [`Notice::Bought`] on the log.
///
/// # Errors
/// - [`TradeError::Refused`] on an empty slot, an unknown member, or goods
///   the party cannot carry
/// - [`TradeError::CannotAfford`] when the party's gold falls short
pub fn buy_from_merchant(
    party: &mut Party,
    member_id: &str,
    trader: &mut Character,
    slot: u32,
    whole_stack: bool,
    config: &TradeConfig,
    notices: &mut NoticeLog,
) -> Result<u64, TradeError> {
    let occupant = trader
        .inventory()
        .bag(BagKind::Merchant)
        .get(slot)
        .ok_or_else(|| TradeError::Refused("nothing is for sale in that slot".to_string()))?;
    // Infinite stock always sells by the unit.
    let goods = if whole_stack && !occupant.infinite {
        occupant.clone()
    } else {
        occupant.fresh_unit()
    };
    let member = party
        .member(member_id)
        .ok_or_else(|| TradeError::Refused(format!("'{member_id}' is not in the party")))?;
    let cost = trading_cost(&goods, Some(member), Some(trader), true, config);
    if party.gold() < cost {
        return Err(TradeError::CannotAfford {
            buyer: member.name.clone(),
            item: goods.name.clone(),
            cost,
        });
    }
    let check = party.can_add_item(&goods);
    if check.is_denied() || check.allowed < goods.stack_size {
        return Err(TradeError::Refused(check.message.unwrap_or_else(|| {
            format!("the party cannot carry {}", goods.name)
        })));
    }
    let Some(mut bought) = trader.remove_item(BagKind::Merchant, slot, whole_stack) else {
        return Err(TradeError::Refused(
            "nothing is for sale in that slot".to_string(),
        ));
    };
    if !party.claims(&bought.owner) && !bought.owner.is_fixed() {
        bought.owner.clear();
    }
    party.add_gold(-i64::try_from(cost).unwrap_or(i64::MAX));
    notices.push(Notice::Bought {
        item: bought.name.clone(),
        stack: bought.stack_size,
        cost,
    });
    party.add_item(BagKind::Backpack, bought, None, LoadContext::Live);
    Ok(cost)
}

/// Sell one of the named member's stacks to `trader`.
///
/// Selling out of the equipped bag honors the combat lock. The goods are
/// priced after they come off, land in the trader's stock, and lose their
/// ownership unless the trader claims them or the claim is fixed. A
/// completed sale lands a [`Notice::Sold`] on the log.
///
/// # Errors
/// - [`TradeError::Refused`] on an empty slot, an unknown member, or gear
///   that cannot come off mid-fight
pub fn sell_to_merchant(
    party: &mut Party,
    member_id: &str,
    trader: &mut Character,
    kind: BagKind,
    slot: u32,
    whole_stack: bool,
    config: &TradeConfig,
    notices: &mut NoticeLog,
) -> Result<u64, TradeError> {
    let member = party
        .member_mut(member_id)
        .ok_or_else(|| TradeError::Refused(format!("'{member_id}' is not in the party")))?;
    let occupant = member
        .inventory()
        .bag(kind)
        .get(slot)
        .ok_or_else(|| TradeError::Refused("there is nothing to sell in that slot".to_string()))?;
    if kind == BagKind::Equipped {
        let check = member.can_unequip(occupant);
        if check.is_denied() {
            return Err(TradeError::Refused(check.message.unwrap_or_default()));
        }
    }
    let Some(mut goods) = member.remove_item(kind, slot, whole_stack) else {
        return Err(TradeError::Refused(
            "there is nothing to sell in that slot".to_string(),
        ));
    };
    let cost = trading_cost(&goods, Some(&*member), Some(&*trader), false, config);
    party.add_gold(i64::try_from(cost).unwrap_or(i64::MAX));
    if !trader.claims(&goods.owner) && !goods.owner.is_fixed() {
        goods.owner.clear();
    }
    notices.push(Notice::Sold {
        item: goods.name.clone(),
        stack: goods.stack_size,
        cost,
    });
    trader.add_item(BagKind::Merchant, goods, None, LoadContext::Live);
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CombatState;
    use crate::item::ItemKind;
    use crate::owner::Owner;
    use crate::slot::EquipSlot;

    fn create_test_item(id: &str, base_cost: u32) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: "A test item".into(),
            base_cost,
            ..Item::default()
        }
    }

    fn create_test_trader() -> Character {
        let mut trader = Character::new("mirek", "Mirek", "guild");
        trader.set_disposition("wanderers", 0);
        trader
    }

    fn create_test_party() -> Party {
        let mut party = Party::new();
        party.add_member(Character::new("vesna", "Vesna", "wanderers"));
        party
    }

    #[test]
    fn strangers_trade_at_raw_cost() {
        let config = TradeConfig::default();
        let mut arrows = create_test_item("arrow", 2);
        arrows.max_stack = 20;
        arrows.stack_size = 10;
        assert_eq!(trading_cost(&arrows, None, None, true, &config), 20);
        assert_eq!(trading_cost(&arrows, None, None, false, &config), 20);
    }

    #[test]
    fn full_trust_buys_at_base_and_sells_at_half() {
        let config = TradeConfig::default();
        let sword = create_test_item("sword", 100);
        let customer = Character::new("vesna", "Vesna", "guild");
        let trader = create_test_trader();
        assert_eq!(
            trading_cost(&sword, Some(&customer), Some(&trader), true, &config),
            100
        );
        assert_eq!(
            trading_cost(&sword, Some(&customer), Some(&trader), false, &config),
            50
        );
    }

    #[test]
    fn persuasion_tilts_prices_towards_the_better_talker() {
        let config = TradeConfig::default();
        let sword = create_test_item("sword", 100);
        let mut customer = Character::new("vesna", "Vesna", "wanderers");
        customer.stats.set_skill(Skill::Persuasion, 2);
        let trader = create_test_trader();
        // Neutral tier is 1.25/0.25; two ranks of advantage move each by 0.10.
        assert_eq!(
            trading_cost(&sword, Some(&customer), Some(&trader), true, &config),
            115
        );
        assert_eq!(
            trading_cost(&sword, Some(&customer), Some(&trader), false, &config),
            35
        );
    }

    #[test]
    fn multiplier_never_drops_below_the_floor() {
        let config = TradeConfig::default();
        let sword = create_test_item("sword", 90);
        let mut customer = Character::new("vesna", "Vesna", "wanderers");
        customer.stats.set_skill(Skill::Persuasion, 40);
        let trader = create_test_trader();
        assert_eq!(
            trading_cost(&sword, Some(&customer), Some(&trader), true, &config),
            5
        );
    }

    #[test]
    fn buying_moves_goods_and_gold() {
        let config = TradeConfig::default();
        let mut party = create_test_party();
        party.add_gold(100);
        let mut trader = create_test_trader();
        let mut lantern = create_test_item("lantern", 30);
        lantern.owner = Owner::of_character("mirek");
        trader.add_item(BagKind::Merchant, lantern, None, LoadContext::Live);

        let mut notices = NoticeLog::new();
        let cost =
            buy_from_merchant(&mut party, "vesna", &mut trader, 0, true, &config, &mut notices)
                .unwrap();
        assert_eq!(cost, 38);
        assert_eq!(party.gold(), 62);
        assert_eq!(trader.total_items(), 0);
        let (slot, bought) = party
            .inventory()
            .bag(BagKind::Backpack)
            .iter()
            .next()
            .unwrap();
        assert_eq!(slot, 0);
        assert_eq!(bought.id, "lantern");
        assert!(bought.owner.is_empty());
        assert!(notices.iter().any(|n| matches!(n, Notice::Bought { cost: 38, .. })));
    }

    #[test]
    fn infinite_stock_sells_by_the_unit_and_never_runs_out() {
        let config = TradeConfig::default();
        let mut party = create_test_party();
        party.add_gold(1_000);
        let mut trader = create_test_trader();
        let mut arrows = create_test_item("arrow", 2);
        arrows.max_stack = 20;
        arrows.infinite = true;
        trader.add_item(BagKind::Merchant, arrows, None, LoadContext::Live);

        let mut notices = NoticeLog::new();
        let cost =
            buy_from_merchant(&mut party, "vesna", &mut trader, 0, true, &config, &mut notices)
                .unwrap();
        assert_eq!(cost, 3);
        assert_eq!(trader.total_items(), 1);
        let bought = party.inventory().bag(BagKind::Backpack).get(0).unwrap();
        assert_eq!(bought.stack_size, 1);
        assert!(!bought.infinite);
    }

    #[test]
    fn empty_purses_cannot_buy() {
        let config = TradeConfig::default();
        let mut party = create_test_party();
        let mut trader = create_test_trader();
        trader.add_item(
            BagKind::Merchant,
            create_test_item("lantern", 30),
            None,
            LoadContext::Live,
        );

        let mut notices = NoticeLog::new();
        let err =
            buy_from_merchant(&mut party, "vesna", &mut trader, 0, true, &config, &mut notices)
                .unwrap_err();
        assert!(notices.is_empty());
        assert_eq!(
            err,
            TradeError::CannotAfford {
                buyer: "Vesna".to_string(),
                item: "Item lantern".to_string(),
                cost: 38,
            }
        );
    }

    #[test]
    fn pooled_headroom_refuses_oversized_purchases() {
        let config = TradeConfig::default();
        let mut party = create_test_party();
        party.add_gold(1_000);
        party.add_water(5.5);
        let mut trader = create_test_trader();
        let mut water = create_test_item("waterskin", 4);
        water.kind = ItemKind::Water;
        water.max_stack = 50;
        water.stack_size = 3;
        trader.add_item(BagKind::Merchant, water, None, LoadContext::Live);

        let mut notices = NoticeLog::new();
        let err =
            buy_from_merchant(&mut party, "vesna", &mut trader, 0, true, &config, &mut notices)
                .unwrap_err();
        assert!(matches!(err, TradeError::Refused(msg) if msg.contains("water")));
    }

    #[test]
    fn selling_pays_the_party_and_stocks_the_trader() {
        let config = TradeConfig::default();
        let mut party = create_test_party();
        let mut trader = create_test_trader();
        trader.set_disposition("wanderers", 100);
        let dagger = create_test_item("dagger", 40);
        party
            .member_mut("vesna")
            .unwrap()
            .add_item(BagKind::Backpack, dagger, None, LoadContext::Live);

        let mut notices = NoticeLog::new();
        let cost = sell_to_merchant(
            &mut party,
            "vesna",
            &mut trader,
            BagKind::Backpack,
            0,
            true,
            &config,
            &mut notices,
        )
        .unwrap();
        assert_eq!(cost, 20);
        assert_eq!(party.gold(), 20);
        assert_eq!(party.member("vesna").unwrap().total_items(), 0);
        let stocked = trader.inventory().bag(BagKind::Merchant).get(0).unwrap();
        assert_eq!(stocked.id, "dagger");
        assert!(notices.iter().any(|n| matches!(n, Notice::Sold { cost: 20, .. })));
    }

    #[test]
    fn combat_lock_blocks_selling_worn_armor() {
        let config = TradeConfig::default();
        let mut party = create_test_party();
        let mut trader = create_test_trader();
        let mut cuirass = create_test_item("cuirass", 90);
        cuirass.kind = ItemKind::Armor;
        cuirass.equip_slots = vec![EquipSlot::Torso];
        {
            let member = party.member_mut("vesna").unwrap();
            member.add_item(
                BagKind::Equipped,
                cuirass,
                Some(EquipSlot::Torso.index()),
                LoadContext::Live,
            );
            member.combat = CombatState::Fighting;
        }

        let mut notices = NoticeLog::new();
        let err = sell_to_merchant(
            &mut party,
            "vesna",
            &mut trader,
            BagKind::Equipped,
            EquipSlot::Torso.index(),
            true,
            &config,
            &mut notices,
        )
        .unwrap_err();
        assert!(matches!(err, TradeError::Refused(msg) if msg.contains("while fighting")));
    }
}
