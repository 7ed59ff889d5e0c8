mod loader;

pub use loader::{
    CityDeductionRecord, CityRecordRow, CountryDeductionRecord, DatasetLoadError, DatasetLoader,
    DatasetTables, ExchangeRateRecord, NeighborhoodRecord, TaxBracketRecord,
};
