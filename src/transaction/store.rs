//! The in-memory, ordered collection of a session's transactions.

use crate::{
    Error,
    transaction::core::{Transaction, TransactionFields, TransactionId},
};

/// An ordered collection of transactions kept in insertion order.
///
/// A transaction can be addressed by its position (zero-based index into the
/// current order) or by its ID. Positions shift down by one for every
/// transaction after a deleted one, whereas IDs never change and are never
/// reused, so request handlers should always address transactions by ID.
#[derive(Debug, Default, Clone)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    next_id: TransactionId,
}

impl TransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction to the end of the store and return it with its new ID.
    pub fn append(&mut self, fields: TransactionFields) -> Transaction {
        let transaction = fields.into_transaction(self.next_id);
        self.next_id += 1;
        self.transactions.push(transaction.clone());

        transaction
    }

    /// A copy of every transaction in insertion order.
    pub fn read_all(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// Overwrite every field of the transaction at `position`.
    ///
    /// The transaction keeps its ID and position.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if `position` is out of range.
    pub fn update(
        &mut self,
        position: usize,
        fields: TransactionFields,
    ) -> Result<Transaction, Error> {
        let transaction = self
            .transactions
            .get_mut(position)
            .ok_or(Error::UpdateMissingTransaction)?;

        *transaction = fields.into_transaction(transaction.id);

        Ok(transaction.clone())
    }

    /// Remove the transaction at `position`, shifting later transactions down.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if `position` is out of range.
    pub fn delete(&mut self, position: usize) -> Result<Transaction, Error> {
        if position >= self.transactions.len() {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(self.transactions.remove(position))
    }

    /// The current position of the transaction with `id`.
    pub fn position_of(&self, id: TransactionId) -> Option<usize> {
        self.transactions
            .iter()
            .position(|transaction| transaction.id == id)
    }

    /// The transaction with `id`, if it exists.
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
    }

    /// Overwrite every field of the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if there is no such transaction.
    pub fn update_by_id(
        &mut self,
        id: TransactionId,
        fields: TransactionFields,
    ) -> Result<Transaction, Error> {
        let position = self
            .position_of(id)
            .ok_or(Error::UpdateMissingTransaction)?;

        self.update(position, fields)
    }

    /// Remove the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if there is no such transaction.
    pub fn delete_by_id(&mut self, id: TransactionId) -> Result<Transaction, Error> {
        let position = self
            .position_of(id)
            .ok_or(Error::DeleteMissingTransaction)?;

        self.delete(position)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The distinct categories in the store, in the order they were first seen.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();

        for transaction in &self.transactions {
            if !categories.contains(&transaction.category) {
                categories.push(transaction.category.clone());
            }
        }

        categories
    }
}
