//! The deposit reconciler: turns an on-chain deposit confirmation into
//! exactly one ledger credit, no matter how many times it is submitted.
//!
//! Resolution failures (unknown chain, undeployed escrow, unregistered
//! wallet or token) and RPC failures all happen before any mutation, so
//! the caller may retry them freely. A hash that is already in the
//! deposit log short-circuits to the recorded result without touching
//! the ledger.

use chrono::Utc;
use premarket_ledger::{BalanceLedger, DepositLog};
use premarket_types::{
    ChainId, DepositRecord, PremarketError, ReconcileOutcome, Result, TxHash, TxPayload,
};
use rust_decimal::Decimal;

use crate::escrow_client::EscrowClient;
use crate::registry::{ContractRegistry, NetworkRegistry, TokenRegistry, WalletRegistry};

/// Consumes blockchain deposit confirmations and credits the ledger
/// exactly once per transaction hash.
pub struct DepositReconciler {
    networks: NetworkRegistry,
    contracts: ContractRegistry,
    wallets: WalletRegistry,
    tokens: TokenRegistry,
    client: Box<dyn EscrowClient>,
}

impl DepositReconciler {
    /// Assemble a reconciler from its registries and the escrow capability.
    #[must_use]
    pub fn new(
        networks: NetworkRegistry,
        contracts: ContractRegistry,
        wallets: WalletRegistry,
        tokens: TokenRegistry,
        client: Box<dyn EscrowClient>,
    ) -> Self {
        Self {
            networks,
            contracts,
            wallets,
            tokens,
            client,
        }
    }

    /// Apply one on-chain deposit to the ledger, or replay the recorded
    /// result if this hash was applied before.
    ///
    /// # Errors
    /// - `NetworkNotFound` / `EscrowNotFound` for an unsupported chain
    /// - `RpcUnreachable` when the chain cannot be read (retryable)
    /// - `DepositEventNotFound` when the transaction carries no deposit
    /// - `WalletNotFound` / `TokenNotFound` for unregistered identities
    /// - `ConsistencyHazard` if the deposit record is refused after the
    ///   credit applied (alertable; must never happen under exclusive
    ///   access)
    pub fn reconcile(
        &self,
        ledger: &mut BalanceLedger,
        log: &mut DepositLog,
        tx_hash: &TxHash,
        chain_id: ChainId,
    ) -> Result<ReconcileOutcome> {
        self.networks.resolve(chain_id)?;
        self.contracts.resolve(chain_id)?;

        let parsed = self
            .client
            .parse_transaction(tx_hash)?
            .ok_or_else(|| PremarketError::DepositEventNotFound(tx_hash.clone()))?;

        // Replay: the deposit was already applied; hand back the recorded
        // result and credit nothing.
        if let Some(existing) = log.get(tx_hash) {
            if existing.log_index != parsed.log_index
                || existing.formatted_amount != parsed.formatted_amount
            {
                tracing::warn!(
                    tx_hash = %tx_hash,
                    recorded_log_index = existing.log_index,
                    parsed_log_index = parsed.log_index,
                    "replayed deposit no longer matches its recorded event"
                );
            }
            tracing::debug!(tx_hash = %tx_hash, "duplicate deposit confirmation, replaying");
            return Ok(existing.outcome());
        }

        let wallet = self.wallets.resolve(&parsed.user_address)?;
        let token_id = self.tokens.resolve(&parsed.token_address)?;

        let new_balance = ledger.credit(wallet.id, token_id, parsed.formatted_amount);
        let record = DepositRecord {
            tx_hash: tx_hash.clone(),
            chain_id,
            log_index: parsed.log_index,
            wallet_id: wallet.id,
            token_id,
            raw_amount: parsed.raw_amount,
            formatted_amount: parsed.formatted_amount,
            new_balance,
            created_at: Utc::now(),
        };
        let outcome = record.outcome();
        log.record(record).map_err(|err| {
            PremarketError::ConsistencyHazard {
                reason: format!("deposit {tx_hash} credited but its record was refused: {err}"),
            }
        })?;

        tracing::info!(
            tx_hash = %tx_hash,
            wallet_id = %outcome.wallet_id,
            amount = %parsed.formatted_amount,
            new_balance = %new_balance,
            "deposit applied"
        );
        Ok(outcome)
    }

    /// Build an unsigned deposit transaction against the escrow deployed
    /// on `chain_id`.
    ///
    /// # Errors
    /// - `NetworkNotFound` / `EscrowNotFound` for an unsupported chain
    pub fn build_deposit(
        &self,
        chain_id: ChainId,
        token_address: &str,
        amount: Decimal,
    ) -> Result<TxPayload> {
        self.networks.resolve(chain_id)?;
        self.contracts.resolve(chain_id)?;
        Ok(self.client.build_deposit(token_address, amount))
    }

    /// Build an unsigned approval transaction granting the escrow on
    /// `chain_id` spending rights.
    ///
    /// # Errors
    /// - `NetworkNotFound` / `EscrowNotFound` for an unsupported chain
    pub fn build_approve(&self, chain_id: ChainId, amount: Decimal) -> Result<TxPayload> {
        self.networks.resolve(chain_id)?;
        let escrow = self.contracts.resolve(chain_id)?;
        Ok(self.client.build_approve(escrow, amount))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use premarket_types::{ChainConfig, ParsedDeposit, TokenId, Wallet, WalletAddress};

    use super::*;

    /// In-memory escrow capability: a map of parseable transactions,
    /// with an optional hard RPC failure.
    struct MapEscrowClient {
        deposits: HashMap<TxHash, ParsedDeposit>,
        unreachable: bool,
    }

    impl EscrowClient for MapEscrowClient {
        fn parse_transaction(&self, tx_hash: &TxHash) -> Result<Option<ParsedDeposit>> {
            if self.unreachable {
                return Err(PremarketError::RpcUnreachable {
                    reason: "connection timed out".into(),
                });
            }
            Ok(self.deposits.get(tx_hash).cloned())
        }

        fn build_deposit(&self, token_address: &str, amount: Decimal) -> TxPayload {
            TxPayload {
                to: token_address.to_string(),
                data: format!("deposit:{amount}"),
                value: Decimal::ZERO,
            }
        }

        fn build_approve(&self, spender: &str, amount: Decimal) -> TxPayload {
            TxPayload {
                to: spender.to_string(),
                data: format!("approve:{amount}"),
                value: Decimal::ZERO,
            }
        }
    }

    struct Fixture {
        reconciler: DepositReconciler,
        ledger: BalanceLedger,
        log: DepositLog,
        wallet: Wallet,
        token_id: TokenId,
    }

    const CHAIN: ChainId = ChainId(8453);
    const TOKEN_ADDRESS: &str = "0xusdc";

    fn setup(deposits: Vec<(&str, ParsedDeposit)>) -> Fixture {
        setup_inner(deposits, false)
    }

    fn setup_unreachable() -> Fixture {
        setup_inner(Vec::new(), true)
    }

    fn setup_inner(deposits: Vec<(&str, ParsedDeposit)>, unreachable: bool) -> Fixture {
        let configs = vec![ChainConfig::base_mainnet(), ChainConfig::base_sepolia()];
        let networks = NetworkRegistry::from_configs(configs.clone());
        let contracts = ContractRegistry::from_configs(&configs);

        let wallet = Wallet::new(WalletAddress::new("0xBuyer0001"));
        let mut wallets = WalletRegistry::new();
        wallets.register(wallet.clone());

        let token_id = TokenId::new();
        let mut tokens = TokenRegistry::new();
        tokens.register(TOKEN_ADDRESS, token_id);

        let client = MapEscrowClient {
            deposits: deposits
                .into_iter()
                .map(|(hash, parsed)| (TxHash::new(hash), parsed))
                .collect(),
            unreachable,
        };

        Fixture {
            reconciler: DepositReconciler::new(
                networks,
                contracts,
                wallets,
                tokens,
                Box::new(client),
            ),
            ledger: BalanceLedger::new(),
            log: DepositLog::new(),
            wallet,
            token_id,
        }
    }

    fn parsed(amount: i64) -> ParsedDeposit {
        ParsedDeposit {
            // Different casing than the registered wallet on purpose.
            user_address: WalletAddress::new("0xBUYER0001"),
            token_address: "0xUSDC".to_string(),
            raw_amount: Decimal::new(amount * 1_000_000, 0),
            formatted_amount: Decimal::new(amount, 0),
            log_index: 2,
        }
    }

    #[test]
    fn deposit_credits_wallet() {
        let mut f = setup(vec![("0xabc", parsed(100))]);
        let outcome = f
            .reconciler
            .reconcile(&mut f.ledger, &mut f.log, &TxHash::new("0xabc"), CHAIN)
            .unwrap();

        assert_eq!(outcome.wallet_id, f.wallet.id);
        assert_eq!(outcome.token_id, f.token_id);
        assert_eq!(outcome.new_balance, Decimal::new(100, 0));
        assert_eq!(
            f.ledger.balance(f.wallet.id, f.token_id),
            Decimal::new(100, 0)
        );
        assert_eq!(f.log.len(), 1);
    }

    #[test]
    fn duplicate_reconcile_is_a_noop_replay() {
        let mut f = setup(vec![("0xabc", parsed(100))]);
        let tx = TxHash::new("0xabc");
        let first = f
            .reconciler
            .reconcile(&mut f.ledger, &mut f.log, &tx, CHAIN)
            .unwrap();

        for _ in 0..3 {
            let replay = f
                .reconciler
                .reconcile(&mut f.ledger, &mut f.log, &tx, CHAIN)
                .unwrap();
            assert_eq!(replay, first);
        }
        assert_eq!(
            f.ledger.balance(f.wallet.id, f.token_id),
            Decimal::new(100, 0),
            "exactly one credit applied"
        );
        assert_eq!(f.log.len(), 1);
        f.ledger.verify_supply(f.token_id).unwrap();
    }

    #[test]
    fn duplicate_with_different_casing_replays() {
        let mut f = setup(vec![("0xAbCdEf", parsed(50))]);
        f.reconciler
            .reconcile(&mut f.ledger, &mut f.log, &TxHash::new("0xAbCdEf"), CHAIN)
            .unwrap();
        let replay = f
            .reconciler
            .reconcile(&mut f.ledger, &mut f.log, &TxHash::new("0xABCDEF"), CHAIN)
            .unwrap();
        assert_eq!(replay.new_balance, Decimal::new(50, 0));
        assert_eq!(
            f.ledger.balance(f.wallet.id, f.token_id),
            Decimal::new(50, 0)
        );
    }

    #[test]
    fn unknown_network_rejected() {
        let mut f = setup(vec![("0xabc", parsed(100))]);
        let err = f
            .reconciler
            .reconcile(&mut f.ledger, &mut f.log, &TxHash::new("0xabc"), ChainId(1))
            .unwrap_err();
        assert!(matches!(err, PremarketError::NetworkNotFound(_)));
    }

    #[test]
    fn undeployed_escrow_rejected() {
        let mut f = setup(vec![("0xabc", parsed(100))]);
        // Base Sepolia is configured but carries no escrow deployment.
        let err = f
            .reconciler
            .reconcile(
                &mut f.ledger,
                &mut f.log,
                &TxHash::new("0xabc"),
                ChainId(84_532),
            )
            .unwrap_err();
        assert!(matches!(err, PremarketError::EscrowNotFound(_)));
    }

    #[test]
    fn transaction_without_deposit_event_rejected() {
        let mut f = setup(vec![]);
        let err = f
            .reconciler
            .reconcile(&mut f.ledger, &mut f.log, &TxHash::new("0xempty"), CHAIN)
            .unwrap_err();
        assert!(matches!(err, PremarketError::DepositEventNotFound(_)));
        assert!(f.log.is_empty());
    }

    #[test]
    fn rpc_failure_is_retryable_and_side_effect_free() {
        let mut f = setup_unreachable();
        let err = f
            .reconciler
            .reconcile(&mut f.ledger, &mut f.log, &TxHash::new("0xabc"), CHAIN)
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(f.log.is_empty());
        assert_eq!(f.ledger.total_supply(f.token_id), Decimal::ZERO);
    }

    #[test]
    fn unregistered_wallet_rejected() {
        let mut deposit = parsed(100);
        deposit.user_address = WalletAddress::new("0xstranger");
        let mut f = setup(vec![("0xabc", deposit)]);

        let err = f
            .reconciler
            .reconcile(&mut f.ledger, &mut f.log, &TxHash::new("0xabc"), CHAIN)
            .unwrap_err();
        assert!(matches!(err, PremarketError::WalletNotFound { .. }));
        assert!(f.log.is_empty());
    }

    #[test]
    fn unregistered_token_rejected() {
        let mut deposit = parsed(100);
        deposit.token_address = "0xshitcoin".to_string();
        let mut f = setup(vec![("0xabc", deposit)]);

        let err = f
            .reconciler
            .reconcile(&mut f.ledger, &mut f.log, &TxHash::new("0xabc"), CHAIN)
            .unwrap_err();
        assert!(matches!(err, PremarketError::TokenNotFound { .. }));
    }

    #[test]
    fn build_deposit_targets_configured_chain() {
        let f = setup(vec![]);
        let payload = f
            .reconciler
            .build_deposit(CHAIN, TOKEN_ADDRESS, Decimal::new(100, 0))
            .unwrap();
        assert_eq!(payload.to, TOKEN_ADDRESS);

        let err = f
            .reconciler
            .build_deposit(ChainId(1), TOKEN_ADDRESS, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, PremarketError::NetworkNotFound(_)));
    }

    #[test]
    fn build_approve_spends_to_escrow() {
        let f = setup(vec![]);
        let payload = f.reconciler.build_approve(CHAIN, Decimal::ONE).unwrap();
        assert_eq!(
            payload.to,
            ChainConfig::base_mainnet().escrow_address.unwrap()
        );
    }
}
