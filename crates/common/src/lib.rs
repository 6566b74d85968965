//! Pledge 基础设施库
//!
//! 为承诺问责服务套件提供基础组件，包括配置管理、钱包地址与登录断言原语、
//! 铸造凭证类型与校验等核心功能

pub mod assertion;
pub mod config;
pub mod error;
pub mod types;
pub mod voucher;

// Re-export commonly used types for convenience
pub use assertion::{AssertionError, AssertionPayload, LoginAssertion};
pub use config::{
    AvsConfig, BindConfig, CourierConfig, DeploymentConfig, LedgerConfig, ObservabilityConfig,
    PledgeConfig, Secrets,
};
pub use error::ConfigError;
pub use types::Address;
pub use voucher::{MintingVoucher, VoucherClaims, VoucherError, VoucherMetadata, VoucherValidator};
