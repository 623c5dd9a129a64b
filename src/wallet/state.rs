/// Connection state mirrored from the wallet provider.
///
/// Created empty, mutated by connect/disconnect and provider events,
/// reset to empty on disconnect or when the provider reports no accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletState {
    pub connected: bool,
    pub address: Option<String>,
    /// Hex chain id as reported by the provider, e.g. "0x2105".
    pub chain_id: Option<String>,
    pub last_error: Option<String>,
}

impl WalletState {
    pub fn reset(&mut self) {
        *self = WalletState::default();
    }

    pub fn set_connected(&mut self, address: String, chain_id: String) {
        self.connected = true;
        self.address = Some(address);
        self.chain_id = Some(chain_id);
        self.last_error = None;
    }
}
