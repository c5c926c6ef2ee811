//! Carried items and gold.

use crate::items::ItemInstance;
use crate::{DelveError, DelveResult, EntityId};
use serde::{Deserialize, Serialize};

/// Bounded item storage plus a gold purse.
///
/// Every operation checks all of its preconditions before mutating, so a
/// failed call leaves both items and gold unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<ItemInstance>,
    capacity: usize,
    pub gold: u32,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            gold: 0,
        }
    }

    pub fn with_gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn items(&self) -> &[ItemInstance] {
        &self.items
    }

    pub fn get(&self, id: EntityId) -> Option<&ItemInstance> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Adds a looted item.
    pub fn try_add(&mut self, item: ItemInstance) -> DelveResult<()> {
        if self.is_full() {
            return Err(DelveError::InventoryFull);
        }
        self.items.push(item);
        Ok(())
    }

    /// Buys an item, paying `price` gold.
    pub fn purchase(&mut self, item: ItemInstance, price: u32) -> DelveResult<()> {
        if self.is_full() {
            return Err(DelveError::InventoryFull);
        }
        if self.gold < price {
            return Err(DelveError::InsufficientGold {
                needed: price,
                available: self.gold,
            });
        }
        self.gold -= price;
        self.items.push(item);
        Ok(())
    }

    /// Sells an item for its sell value, returning the gold received.
    pub fn sell(&mut self, id: EntityId) -> DelveResult<u32> {
        let item = self.take(id)?;
        self.gold = self.gold.saturating_add(item.sell_value);
        Ok(item.sell_value)
    }

    /// Removes and returns an item.
    pub fn take(&mut self, id: EntityId) -> DelveResult<ItemInstance> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| DelveError::InvalidAction(format!("no item {id}")))?;
        Ok(self.items.remove(index))
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }
}
