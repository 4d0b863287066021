pub mod numeric;
pub mod resolv_conf;

pub use numeric::{NumericAddrInfo, NumericHostResolver};
pub use resolv_conf::{NoSystemDns, ResolvConf, StaticSystemDns, SystemDnsConfig};
