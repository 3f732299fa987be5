//! Data transforms shared by the modeling components.

mod scale;

pub use scale::ChannelScaler;
