mod browser;
mod interfaces;

pub use browser::MdnsDiscovery;
