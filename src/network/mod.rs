pub mod archive;
pub mod network;
pub mod options;

pub use network::Network;
pub use options::NetworkOptions;
