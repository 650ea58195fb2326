//! Bank-integration collaborator. Clients that never linked an institution
//! simply have empty lists.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::backend::{BackendError, BackendResult};
use crate::models::{ClientId, OpenFinanceAccount, OpenFinanceInvestment, OpenFinanceTransaction};

#[async_trait::async_trait]
pub trait OpenFinanceSource: Send + Sync {
    async fn list_accounts(&self, client: ClientId) -> BackendResult<Vec<OpenFinanceAccount>>;

    async fn list_investments(&self, client: ClientId)
        -> BackendResult<Vec<OpenFinanceInvestment>>;

    async fn list_transactions(
        &self,
        client: ClientId,
    ) -> BackendResult<Vec<OpenFinanceTransaction>>;

    fn name(&self) -> &str;
}

/// Integration that has nothing linked.
pub struct NoopOpenFinance;

#[async_trait::async_trait]
impl OpenFinanceSource for NoopOpenFinance {
    async fn list_accounts(&self, _client: ClientId) -> BackendResult<Vec<OpenFinanceAccount>> {
        Ok(Vec::new())
    }

    async fn list_investments(
        &self,
        _client: ClientId,
    ) -> BackendResult<Vec<OpenFinanceInvestment>> {
        Ok(Vec::new())
    }

    async fn list_transactions(
        &self,
        _client: ClientId,
    ) -> BackendResult<Vec<OpenFinanceTransaction>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

#[derive(Debug, Clone, Default)]
struct LinkedData {
    accounts: Vec<OpenFinanceAccount>,
    investments: Vec<OpenFinanceInvestment>,
    transactions: Vec<OpenFinanceTransaction>,
}

/// In-memory integration for tests.
#[derive(Default)]
pub struct MemoryOpenFinance {
    linked: Mutex<HashMap<ClientId, LinkedData>>,
    unavailable: Mutex<bool>,
}

impl MemoryOpenFinance {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn link_account(&self, client: ClientId, account: OpenFinanceAccount) {
        self.linked
            .lock()
            .await
            .entry(client)
            .or_default()
            .accounts
            .push(account);
    }

    pub async fn add_investment(&self, client: ClientId, investment: OpenFinanceInvestment) {
        self.linked
            .lock()
            .await
            .entry(client)
            .or_default()
            .investments
            .push(investment);
    }

    pub async fn add_transaction(&self, client: ClientId, transaction: OpenFinanceTransaction) {
        self.linked
            .lock()
            .await
            .entry(client)
            .or_default()
            .transactions
            .push(transaction);
    }

    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().await = unavailable;
    }

    async fn data(&self, client: ClientId) -> BackendResult<LinkedData> {
        if *self.unavailable.lock().await {
            return Err(BackendError::Unavailable(
                "open finance integration offline".to_string(),
            ));
        }
        Ok(self
            .linked
            .lock()
            .await
            .get(&client)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl OpenFinanceSource for MemoryOpenFinance {
    async fn list_accounts(&self, client: ClientId) -> BackendResult<Vec<OpenFinanceAccount>> {
        Ok(self.data(client).await?.accounts)
    }

    async fn list_investments(
        &self,
        client: ClientId,
    ) -> BackendResult<Vec<OpenFinanceInvestment>> {
        Ok(self.data(client).await?.investments)
    }

    async fn list_transactions(
        &self,
        client: ClientId,
    ) -> BackendResult<Vec<OpenFinanceTransaction>> {
        Ok(self.data(client).await?.transactions)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_has_nothing_linked() {
        let client = ClientId::new(9);
        assert!(NoopOpenFinance.list_accounts(client).await.unwrap().is_empty());
        assert!(NoopOpenFinance.list_transactions(client).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_integration_is_scoped_per_client() {
        let of = MemoryOpenFinance::new();
        of.link_account(
            ClientId::new(1),
            OpenFinanceAccount {
                id: "acc".to_string(),
                institution: "Banco".to_string(),
                kind: "checking".to_string(),
                balance: 10.0,
            },
        )
        .await;
        assert_eq!(of.list_accounts(ClientId::new(1)).await.unwrap().len(), 1);
        assert!(of.list_accounts(ClientId::new(2)).await.unwrap().is_empty());

        of.set_unavailable(true).await;
        assert!(of.list_accounts(ClientId::new(1)).await.is_err());
    }
}
