pub mod analytics;
pub mod company;
pub mod customer;
pub mod stock_price;

pub use analytics::{
    CurrencyCount, MonthlyJoins, PriceRange, PriceTrendPoint, SectorCountryCount, TenureBySegment,
};
pub use company::Company;
pub use customer::{Customer, CustomerId};
pub use stock_price::StockPriceRecord;
