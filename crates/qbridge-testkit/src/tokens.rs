//! In-memory fungible token module
//!
//! Balances are keyed by `(token, holder)`. The native currency is the `Address::NATIVE` token:
//! a caller "attaching value" to a send is modelled as `transfer_into` debiting its native
//! balance. Token pulls are allowance-based, with the custody account as spender.

use std::collections::BTreeMap;

use qbridge_core::{hash, Address, Amount, BridgeError, Result, TokenEffects};

/// Token module backed by maps
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokens {
    balances: BTreeMap<(Address, Address), Amount>,
    allowances: BTreeMap<(Address, Address, Address), Amount>,
    supply: BTreeMap<Address, Amount>,
    wrapped: BTreeMap<Address, String>,
}

impl InMemoryTokens {
    /// Empty module
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `holder` `amount` of `token` out of thin air
    pub fn credit(&mut self, token: Address, holder: Address, amount: Amount) {
        *self.balances.entry((token, holder)).or_default() += amount;
        *self.supply.entry(token).or_default() += amount;
    }

    /// Let `spender` pull up to `amount` of `owner`'s `token`
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((token, owner, spender), amount);
    }

    /// Balance of `holder`
    pub fn balance_of(&self, token: &Address, holder: &Address) -> Amount {
        self.balances.get(&(*token, *holder)).copied().unwrap_or(0)
    }

    /// Remaining allowance
    pub fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Units of `token` in existence
    pub fn total_supply(&self, token: &Address) -> Amount {
        self.supply.get(token).copied().unwrap_or(0)
    }

    /// Display name of a wrapped token created through [`TokenEffects::create_wrapped`]
    pub fn wrapped_name(&self, token: &Address) -> Option<&str> {
        self.wrapped.get(token).map(String::as_str)
    }

    fn debit(&mut self, token: &Address, holder: &Address, amount: Amount) -> Result<()> {
        let balance = self.balance_of(token, holder);
        if balance < amount {
            return Err(BridgeError::insufficient_funds(format!(
                "{holder} holds {balance} of {token}, needs {amount}"
            )));
        }
        self.balances.insert((*token, *holder), balance - amount);
        Ok(())
    }

    fn deposit(&mut self, token: &Address, holder: &Address, amount: Amount) {
        *self.balances.entry((*token, *holder)).or_default() += amount;
    }

    fn require_wrapped(&self, token: &Address) -> Result<()> {
        if self.wrapped.contains_key(token) {
            return Ok(());
        }
        Err(BridgeError::token(format!("{token} is not a wrapped token")))
    }
}

impl TokenEffects for InMemoryTokens {
    fn transfer_into(
        &mut self,
        token: &Address,
        custody: &Address,
        from: &Address,
        amount: Amount,
    ) -> Result<()> {
        if *token != Address::NATIVE {
            let allowance = self.allowance(token, from, custody);
            if allowance < amount {
                return Err(BridgeError::insufficient_funds(format!(
                    "allowance {allowance} of {token} below {amount}"
                )));
            }
            self.debit(token, from, amount)?;
            self.allowances
                .insert((*token, *from, *custody), allowance - amount);
        } else {
            self.debit(token, from, amount)?;
        }
        self.deposit(token, custody, amount);
        Ok(())
    }

    fn transfer_out(
        &mut self,
        token: &Address,
        custody: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        self.debit(token, custody, amount)?;
        self.deposit(token, to, amount);
        Ok(())
    }

    fn mint_to(&mut self, token: &Address, to: &Address, amount: Amount) -> Result<()> {
        self.require_wrapped(token)?;
        self.credit(*token, *to, amount);
        Ok(())
    }

    fn burn_from(&mut self, token: &Address, holder: &Address, amount: Amount) -> Result<()> {
        self.require_wrapped(token)?;
        self.debit(token, holder, amount)?;
        if let Some(supply) = self.supply.get_mut(token) {
            *supply = supply.saturating_sub(amount);
        }
        Ok(())
    }

    fn create_wrapped(&mut self, display_name: &str) -> Result<Address> {
        let mut h = hash::hasher();
        h.update(b"qbridge-wrapped")
            .update(display_name.as_bytes())
            .update_word(self.wrapped.len() as u128);
        let digest = h.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        let token = Address(bytes);
        self.wrapped.insert(token, display_name.to_string());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Address = Address([7u8; 20]);
    const ALICE: Address = Address([1u8; 20]);
    const CUSTODY: Address = Address([9u8; 20]);

    #[test]
    fn test_pull_requires_allowance() {
        let mut tokens = InMemoryTokens::new();
        tokens.credit(TOKEN, ALICE, 100);
        let err = tokens.transfer_into(&TOKEN, &CUSTODY, &ALICE, 50).unwrap_err();
        assert!(matches!(err, BridgeError::InsufficientFunds { .. }));

        tokens.approve(TOKEN, ALICE, CUSTODY, 50);
        tokens.transfer_into(&TOKEN, &CUSTODY, &ALICE, 50).unwrap();
        assert_eq!(tokens.balance_of(&TOKEN, &CUSTODY), 50);
        assert_eq!(tokens.allowance(&TOKEN, &ALICE, &CUSTODY), 0);
    }

    #[test]
    fn test_only_wrapped_tokens_mint() {
        let mut tokens = InMemoryTokens::new();
        assert!(tokens.mint_to(&TOKEN, &ALICE, 1).is_err());
        let wrapped = tokens.create_wrapped("Wrapped Seven").unwrap();
        tokens.mint_to(&wrapped, &ALICE, 5).unwrap();
        assert_eq!(tokens.total_supply(&wrapped), 5);
        tokens.burn_from(&wrapped, &ALICE, 5).unwrap();
        assert_eq!(tokens.total_supply(&wrapped), 0);
        assert_eq!(tokens.wrapped_name(&wrapped), Some("Wrapped Seven"));
    }

    #[test]
    fn test_wrapped_addresses_are_distinct() {
        let mut tokens = InMemoryTokens::new();
        let a = tokens.create_wrapped("Same").unwrap();
        let b = tokens.create_wrapped("Same").unwrap();
        assert_ne!(a, b);
    }
}
