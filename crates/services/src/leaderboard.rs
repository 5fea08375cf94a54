use std::collections::HashMap;
use std::sync::Arc;

use detective_core::model::Address;
use tracing::debug;

use crate::contract::CaseContract;
use crate::error::ChainError;
use crate::social::HandleLookup;

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub address: Address,
    pub handle: Option<String>,
    pub cases: u32,
}

impl LeaderboardEntry {
    /// Handle if one resolved, otherwise the shortened address.
    #[must_use]
    pub fn display(&self) -> String {
        self.handle.clone().unwrap_or_else(|| self.address.short())
    }
}

/// Ranks players by how many cases they have closed on-chain.
#[derive(Clone)]
pub struct LeaderboardService {
    contract: Arc<dyn CaseContract>,
    handles: Option<Arc<dyn HandleLookup>>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(contract: Arc<dyn CaseContract>, handles: Option<Arc<dyn HandleLookup>>) -> Self {
        Self { contract, handles }
    }

    /// Read completed players and rank them.
    ///
    /// Handle lookups are best effort; a failed lookup leaves `handle` empty.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` if the completed-user list cannot be read.
    pub async fn load(&self) -> Result<Vec<LeaderboardEntry>, ChainError> {
        let users = self.contract.completed_users().await?;
        debug!(entries = users.len(), "completed users loaded");

        let mut entries = rank_completions(&users);
        if let Some(handles) = &self.handles {
            for entry in &mut entries {
                entry.handle = handles.handle_for(entry.address).await;
            }
        }
        Ok(entries)
    }
}

/// Count completions per distinct address and rank by count, keeping
/// first-seen order between equal counts.
#[must_use]
pub fn rank_completions(users: &[Address]) -> Vec<LeaderboardEntry> {
    let mut order: Vec<Address> = Vec::new();
    let mut counts: HashMap<Address, u32> = HashMap::new();
    for user in users {
        let count = counts.entry(*user).or_insert_with(|| {
            order.push(*user);
            0
        });
        *count = count.saturating_add(1);
    }

    let mut ranked: Vec<(Address, u32)> = order
        .into_iter()
        .map(|address| (address, counts.get(&address).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (address, cases))| LeaderboardEntry {
            rank: index + 1,
            address,
            handle: None,
            cases,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn ranks_by_count_then_first_seen() {
        let users = [addr(1), addr(2), addr(3), addr(2), addr(3), addr(3)];
        let ranked = rank_completions(&users);
        let summary: Vec<_> = ranked.iter().map(|e| (e.rank, e.address, e.cases)).collect();
        assert_eq!(
            summary,
            vec![(1, addr(3), 3), (2, addr(2), 2), (3, addr(1), 1)]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let users = [addr(9), addr(4), addr(7)];
        let ranked = rank_completions(&users);
        let order: Vec<_> = ranked.iter().map(|e| e.address).collect();
        assert_eq!(order, vec![addr(9), addr(4), addr(7)]);
    }

    #[test]
    fn empty_list_is_empty_board() {
        assert!(rank_completions(&[]).is_empty());
    }

    #[test]
    fn display_falls_back_to_short_address() {
        let entry = LeaderboardEntry {
            rank: 1,
            address: addr(0xab),
            handle: None,
            cases: 1,
        };
        assert_eq!(entry.display(), "0xabab...abab");
    }
}
