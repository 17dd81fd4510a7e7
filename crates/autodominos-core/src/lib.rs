pub mod addresses;
pub mod app_config;
pub mod codes;
pub mod config;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod types;

pub use addresses::{load_addresses, Address, AddressEntry, AddressesFile};
pub use app_config::AppConfig;
pub use codes::{expand_case_variants, load_candidate_codes, normalize_codes_file};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use lookup::{LookupTable, ProvinceEntry, ResolvedLocation};
pub use normalize::{city_key, province_key, remove_accents, store_alias, street_key};
pub use types::{
    AppliedPromotion, Coords, OrderType, ReportEntry, Store, StoreReport, UnknownOrderType,
    WorkingCode,
};
