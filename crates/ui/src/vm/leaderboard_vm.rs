use services::LeaderboardEntry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRowVm {
    pub rank: usize,
    pub name: String,
    pub address: String,
    pub cases_label: String,
    pub has_handle: bool,
}

impl From<&LeaderboardEntry> for LeaderboardRowVm {
    fn from(entry: &LeaderboardEntry) -> Self {
        let cases_label = match entry.cases {
            1 => "1 case closed".to_string(),
            n => format!("{n} cases closed"),
        };
        Self {
            rank: entry.rank,
            name: entry.display(),
            address: entry.address.to_checksum(),
            cases_label,
            has_handle: entry.handle.is_some(),
        }
    }
}

#[must_use]
pub fn map_leaderboard_rows(entries: &[LeaderboardEntry]) -> Vec<LeaderboardRowVm> {
    entries.iter().map(LeaderboardRowVm::from).collect()
}
