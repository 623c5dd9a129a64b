/// Log tags identify the subsystem a message originates from and drive the
/// per-module `--debug-<module>` filtering.
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    Wallet,
    Quote,
    Approval,
    Swap,
    Orderbook,
    Config,
    System,
}

impl LogTag {
    /// Key used in `--debug-<key>` command-line flags.
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::Wallet => "wallet",
            LogTag::Quote => "quote",
            LogTag::Approval => "approval",
            LogTag::Swap => "swap",
            LogTag::Orderbook => "orderbook",
            LogTag::Config => "config",
            LogTag::System => "system",
        }
        .to_string()
    }

    /// Colored label for console output.
    pub fn label(&self) -> ColoredString {
        match self {
            LogTag::Wallet => "WALLET".blue().bold(),
            LogTag::Quote => "QUOTE".cyan().bold(),
            LogTag::Approval => "APPROVAL".magenta().bold(),
            LogTag::Swap => "SWAP".bright_yellow().bold(),
            LogTag::Orderbook => "ORDERBOOK".bright_green().bold(),
            LogTag::Config => "CONFIG".white().bold(),
            LogTag::System => "SYSTEM".green().bold(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_key().to_uppercase())
    }
}
