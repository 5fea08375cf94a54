use services::{AddressReport, ContractSource, ExplorerTx, Lookup, format_ether};

use crate::vm::time_fmt::format_optional_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxRowVm {
    pub hash: String,
    pub direction: String,
    pub value: String,
    pub when: String,
    pub failed: bool,
}

impl TxRowVm {
    fn from_tx(tx: &ExplorerTx, subject: &str) -> Self {
        let from = tx.from.map(|address| address.to_checksum());
        let to = tx.to.map(|address| address.to_checksum());
        let direction = match (from.as_deref(), to.as_deref()) {
            (Some(from), _) if from == subject => {
                format!("out to {}", tx.to.map_or_else(|| "contract creation".into(), |a| a.short()))
            }
            (_, Some(to)) if to == subject => {
                format!("in from {}", tx.from.map_or_else(|| "unknown".into(), |a| a.short()))
            }
            _ => "related".to_string(),
        };
        Self {
            hash: shorten_hash(&tx.hash),
            direction,
            value: format!("{} ETH", format_ether(tx.value_wei)),
            when: format_optional_datetime(tx.timestamp),
            failed: tx.failed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisVm {
    pub address: String,
    pub kind_label: &'static str,
    pub bytecode_label: String,
    pub balance_label: String,
    pub explorer_url: String,
    pub source_label: Option<String>,
    pub transactions: Vec<TxRowVm>,
    pub transactions_note: Option<String>,
}

impl From<&AddressReport> for AnalysisVm {
    fn from(report: &AddressReport) -> Self {
        let address = report.checksum_address();
        let (transactions, transactions_note) = match &report.recent_transactions {
            None => (Vec::new(), None),
            Some(Lookup::Unavailable(reason)) => {
                (Vec::new(), Some(format!("Transactions unavailable: {reason}")))
            }
            Some(Lookup::Found(txs)) if txs.is_empty() => {
                (Vec::new(), Some("No transactions found.".to_string()))
            }
            Some(Lookup::Found(txs)) => (
                txs.iter().map(|tx| TxRowVm::from_tx(tx, &address)).collect(),
                None,
            ),
        };
        Self {
            kind_label: if report.has_bytecode {
                "Smart contract"
            } else {
                "Wallet (no bytecode)"
            },
            bytecode_label: format!("{} bytes of bytecode", report.bytecode_len),
            balance_label: format!("{} ETH", report.balance_eth),
            explorer_url: report.explorer_url.clone(),
            source_label: report.source.as_ref().map(source_label),
            transactions,
            transactions_note,
            address,
        }
    }
}

fn source_label(lookup: &Lookup<ContractSource>) -> String {
    match lookup {
        Lookup::Unavailable(reason) => format!("Source unavailable: {reason}"),
        Lookup::Found(source) if !source.verified => "Source not verified".to_string(),
        Lookup::Found(source) => {
            let name = source.contract_name.as_deref().unwrap_or("Unnamed contract");
            match source.compiler_version.as_deref() {
                Some(compiler) => format!("Verified: {name} ({compiler})"),
                None => format!("Verified: {name}"),
            }
        }
    }
}

fn shorten_hash(hash: &str) -> String {
    if hash.len() <= 14 {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..10], &hash[hash.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use detective_core::model::Address;

    fn report() -> AddressReport {
        AddressReport {
            address: Address::from_bytes([0x11; 20]),
            has_bytecode: true,
            bytecode_len: 42,
            balance_wei: 1_500_000_000_000_000_000,
            balance_eth: "1.5".into(),
            explorer_url: "https://basescan.org/address/0x11".into(),
            source: Some(Lookup::Found(ContractSource {
                verified: true,
                contract_name: Some("Detective".into()),
                compiler_version: Some("v0.8.24".into()),
            })),
            recent_transactions: Some(Lookup::Unavailable("rate limited".into())),
        }
    }

    #[test]
    fn report_maps_to_display_rows() {
        let vm = AnalysisVm::from(&report());
        assert_eq!(vm.kind_label, "Smart contract");
        assert_eq!(vm.bytecode_label, "42 bytes of bytecode");
        assert_eq!(vm.balance_label, "1.5 ETH");
        assert_eq!(vm.source_label.as_deref(), Some("Verified: Detective (v0.8.24)"));
        assert!(vm.transactions.is_empty());
        assert_eq!(
            vm.transactions_note.as_deref(),
            Some("Transactions unavailable: rate limited")
        );
    }

    #[test]
    fn outgoing_transactions_name_the_recipient() {
        let subject = Address::from_bytes([0x11; 20]);
        let other = Address::from_bytes([0x22; 20]);
        let mut report = report();
        report.recent_transactions = Some(Lookup::Found(vec![ExplorerTx {
            hash: format!("0x{}", "ab".repeat(32)),
            from: Some(subject),
            to: Some(other),
            value_wei: 0,
            timestamp: None,
            failed: true,
        }]));

        let vm = AnalysisVm::from(&report);
        let row = &vm.transactions[0];
        assert_eq!(row.direction, format!("out to {}", other.short()));
        assert_eq!(row.value, "0 ETH");
        assert_eq!(row.when, "--");
        assert!(row.failed);
        assert_eq!(row.hash, "0xabababab...abab");
    }
}
