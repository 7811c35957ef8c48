//! Container Module
//!
//! Anything that owns an [`Inventory`] and wants a say in what goes into it
//! implements [`Container`]: characters, the shared party stash, and loot
//! piles on the ground. The trait routes every insertion and removal through
//! the owner's acceptance check and side-effect hooks so weight, light, and
//! stat bookkeeping can never drift out of sync with bag contents.

use crate::inventory::{Acceptance, Bag, Inventory, LoadContext};
use crate::item::Item;
use crate::owner::Owner;
use crate::slot::BagKind;

/// An inventory owner. Insertions and removals should go through
/// [`Container::add_item`] and [`Container::remove_item`] rather than the
/// raw bag operations, so the owner's hooks fire.
pub trait Container {
    fn inventory(&self) -> &Inventory;
    fn inventory_mut(&mut self) -> &mut Inventory;

    /// Name used in notices and log lines.
    fn display_name(&self) -> String;

    /// How many units of `item` this container will accept right now.
    /// The default accepts the whole stack.
    fn can_add_item(&self, item: &Item) -> Acceptance {
        Acceptance::allow(item.stack_size.max(1))
    }

    /// Hook fired after `item` lands in `kind` at `slot`. `item` is the
    /// incoming stack, which may since have merged into a resident one.
    fn on_item_add(&mut self, _item: &Item, _kind: BagKind, _slot: u32, _ctx: LoadContext) {}

    /// Hook fired after `item` leaves `kind` from `slot`.
    fn on_item_remove(&mut self, _item: &Item, _kind: BagKind, _slot: u32) {}

    /// Whether the player answers for this container's conduct. Theft rules
    /// only bite containers that return `true` here.
    fn player_controlled(&self) -> bool {
        false
    }

    /// Whether this container is entitled to items claimed by `owner`.
    fn claims(&self, _owner: &Owner) -> bool {
        false
    }

    /// Place `item` in `kind`, preferring `slot` when given. Runs the add
    /// hook (and the remove hook for anything displaced) and returns the
    /// displaced occupant, if any.
    fn add_item(
        &mut self,
        kind: BagKind,
        item: Item,
        slot: Option<u32>,
        ctx: LoadContext,
    ) -> Option<Item> {
        let incoming = item.clone();
        let placement = self.inventory_mut().place(kind, item, slot);
        if let Some(displaced) = &placement.displaced {
            self.on_item_remove(displaced, kind, placement.slot);
        }
        self.on_item_add(&incoming, kind, placement.slot, ctx);
        placement.displaced
    }

    /// Take from `kind` at `slot`, either the whole stack or a single unit.
    /// Runs the remove hook once per call. Empty slots return `None` and
    /// fire nothing.
    fn remove_item(&mut self, kind: BagKind, slot: u32, whole_stack: bool) -> Option<Item> {
        let removed = self.inventory_mut().remove_from_bag(kind, slot, whole_stack)?;
        self.on_item_remove(&removed, kind, slot);
        Some(removed)
    }

    /// Occupied slot count across every bag.
    fn total_items(&self) -> usize {
        self.inventory().total_items()
    }
}

/// Read-only trading facade over a container's merchant stock. Keeps trade
/// screens from reaching into the other bags by accident.
pub struct MerchantView<'a> {
    container: &'a dyn Container,
}

impl<'a> MerchantView<'a> {
    pub fn new(container: &'a dyn Container) -> Self {
        Self { container }
    }

    /// The merchant bag being offered for sale.
    pub fn stock(&self) -> &Bag {
        self.container.inventory().bag(BagKind::Merchant)
    }

    /// Number of distinct stacks on offer.
    pub fn stack_count(&self) -> usize {
        self.stock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: "A test item".into(),
            ..Item::default()
        }
    }

    struct Crate {
        inventory: Inventory,
        adds: u32,
        removes: u32,
    }

    impl Crate {
        fn new() -> Self {
            Self {
                inventory: Inventory::new(),
                adds: 0,
                removes: 0,
            }
        }
    }

    impl Container for Crate {
        fn inventory(&self) -> &Inventory {
            &self.inventory
        }

        fn inventory_mut(&mut self) -> &mut Inventory {
            &mut self.inventory
        }

        fn display_name(&self) -> String {
            "wooden crate".to_string()
        }

        fn on_item_add(&mut self, _item: &Item, _kind: BagKind, _slot: u32, _ctx: LoadContext) {
            self.adds += 1;
        }

        fn on_item_remove(&mut self, _item: &Item, _kind: BagKind, _slot: u32) {
            self.removes += 1;
        }
    }

    #[test]
    fn add_item_fires_add_hook_once() {
        let mut holder = Crate::new();
        let displaced = holder.add_item(
            BagKind::Backpack,
            create_test_item("rope"),
            None,
            LoadContext::Live,
        );
        assert!(displaced.is_none());
        assert_eq!(holder.adds, 1);
        assert_eq!(holder.removes, 0);
    }

    #[test]
    fn displacement_fires_remove_hook_for_the_old_occupant() {
        let mut holder = Crate::new();
        holder.add_item(
            BagKind::Backpack,
            create_test_item("rope"),
            Some(0),
            LoadContext::Live,
        );
        let displaced = holder.add_item(
            BagKind::Backpack,
            create_test_item("lantern"),
            Some(0),
            LoadContext::Live,
        );
        assert_eq!(displaced.unwrap().id, "rope");
        assert_eq!(holder.adds, 2);
        assert_eq!(holder.removes, 1);
    }

    #[test]
    fn remove_item_on_empty_slot_fires_nothing() {
        let mut holder = Crate::new();
        assert!(holder.remove_item(BagKind::Backpack, 3, true).is_none());
        assert_eq!(holder.removes, 0);
    }

    #[test]
    fn merchant_view_only_sees_the_merchant_bag() {
        let mut holder = Crate::new();
        holder.add_item(
            BagKind::Backpack,
            create_test_item("rope"),
            None,
            LoadContext::Live,
        );
        holder.add_item(
            BagKind::Merchant,
            create_test_item("lantern"),
            None,
            LoadContext::Live,
        );
        let view = MerchantView::new(&holder);
        assert_eq!(view.stack_count(), 1);
        assert!(view.stock().iter().all(|(_, item)| item.id == "lantern"));
    }
}
