mod stark_api;

pub use stark_api::StarkApi;
pub use stark_api::BYPASS_HEADER;
