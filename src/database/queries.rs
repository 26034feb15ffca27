//! SQL text for every statement the API issues.
//!
//! Nothing here is ever formatted with caller input. The only dynamic
//! statement, [`fetch_table`], interpolates identifiers taken from the
//! [`TableName`] allow-list; the ticker filter is bound as `$1`.

use crate::database::store::TableName;

pub const AVG_TENURE: &str = "\
SELECT segment, ROUND(AVG(tenureyears)::numeric, 2) AS avg_tenure
FROM customers
GROUP BY segment
ORDER BY avg_tenure DESC NULLS LAST, segment ASC";

pub const MONTHLY_JOINS: &str = "\
SELECT TO_CHAR(joindate, 'YYYY-MM') AS month, COUNT(*) AS new_customers
FROM customers
GROUP BY 1
ORDER BY 1";

pub const BY_SECTOR_COUNTRY: &str = "\
SELECT country, sector, COUNT(*) AS company_count
FROM companies
GROUP BY country, sector
ORDER BY country, sector";

pub const CURRENCY_DISTRIBUTION: &str = "\
SELECT currency, COUNT(*) AS company_count
FROM companies
GROUP BY currency
ORDER BY company_count DESC, currency ASC";

/// `$1` is the optional ticker (`NULL` selects every ticker)
pub const PRICE_TREND: &str = "\
SELECT ticker,
       TO_DATE(date, 'DD/MM/YYYY') AS trade_date,
       ROUND(AVG(close)::numeric, 2) AS avg_close
FROM stock_prices
WHERE ($1::text IS NULL OR ticker = $1::text)
GROUP BY ticker, trade_date
ORDER BY trade_date ASC, ticker ASC";

pub const VOLATILITY: &str = "\
SELECT ticker, ROUND((MAX(close) - MIN(close))::numeric, 2) AS price_range
FROM stock_prices
GROUP BY ticker
ORDER BY price_range DESC NULLS LAST, ticker ASC";

pub const HEALTH_CHECK: &str = "SELECT 1";

/// Plain listing of a table, as written to the query log
pub fn fetch_table_display(table: TableName) -> String {
    format!(
        "SELECT * FROM {} ORDER BY {} ASC",
        table.as_str(),
        table.first_column()
    )
}

/// Same listing with each row encoded as a JSON object
pub fn fetch_table(table: TableName) -> String {
    format!(
        "SELECT row_to_json(t) AS row FROM {} t ORDER BY t.{} ASC",
        table.as_str(),
        table.first_column()
    )
}
