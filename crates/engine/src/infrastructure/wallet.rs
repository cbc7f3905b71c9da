//! Wallet adapters.

use dashmap::DashMap;
use reforge_domain::{ActorId, Price};

use crate::infrastructure::ports::{PaymentError, WalletPort};

/// Balances kept in memory. Actors without an account start at
/// `starting_balance`.
pub struct InMemoryWallet {
    balances: DashMap<ActorId, f64>,
    starting_balance: f64,
}

impl InMemoryWallet {
    pub fn new(starting_balance: f64) -> Self {
        Self {
            balances: DashMap::new(),
            starting_balance,
        }
    }

    pub fn balance(&self, actor: &ActorId) -> f64 {
        self.balances
            .get(actor)
            .map(|entry| *entry)
            .unwrap_or(self.starting_balance)
    }

    pub fn deposit(&self, actor: &ActorId, amount: f64) {
        *self
            .balances
            .entry(actor.clone())
            .or_insert(self.starting_balance) += amount.max(0.0);
    }
}

impl WalletPort for InMemoryWallet {
    fn withdraw(&self, actor: &ActorId, amount: Price) -> Result<(), PaymentError> {
        let mut entry = self
            .balances
            .entry(actor.clone())
            .or_insert(self.starting_balance);
        if *entry < amount.amount() {
            return Err(PaymentError::InsufficientFunds {
                required: amount,
                available: Price::new(*entry).unwrap_or(Price::FREE),
            });
        }
        *entry -= amount.amount();
        Ok(())
    }

    fn refund(&self, actor: &ActorId, amount: Price) -> Result<(), PaymentError> {
        self.deposit(actor, amount.amount());
        Ok(())
    }
}

/// No economy: every reforge is paid for.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmetered;

impl WalletPort for Unmetered {
    fn withdraw(&self, _actor: &ActorId, _amount: Price) -> Result<(), PaymentError> {
        Ok(())
    }

    fn refund(&self, _actor: &ActorId, _amount: Price) -> Result<(), PaymentError> {
        Ok(())
    }
}
