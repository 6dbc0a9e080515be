//! Symbol universe and provider tuning constants.
//!
//! The Nifty tables double as the fallback symbol universe: they feed the
//! MoneyControl per-symbol index fetch, company-name lookups, and the
//! synthetic generator when every remote provider is down.

/// Exchange prefix used for Indian symbols (e.g. "NSE:RELIANCE")
pub const NSE_PREFIX: &str = "NSE:";

/// Divisor converting a raw market cap (INR) into crores
pub const CRORE: f64 = 10_000_000.0;

/// Maximum constituents fetched one-by-one from MoneyControl.
/// Each symbol is a separate request, so the index fallback is capped.
pub const MONEYCONTROL_INDEX_FETCH_LIMIT: usize = 20;

/// Maximum symbols quoted per exchange listing from Finnhub (free-tier rate limits)
pub const FINNHUB_SYMBOL_FETCH_LIMIT: usize = 30;

/// Finnhub free-tier budget enforced by the shared rate limiter
pub const FINNHUB_RATE_LIMIT_PER_MINUTE: u32 = 60;

/// Nifty 50 constituents: (symbol, company name)
pub const NIFTY_50: &[(&str, &str)] = &[
    ("RELIANCE", "Reliance Industries Ltd."),
    ("TCS", "Tata Consultancy Services Ltd."),
    ("HDFCBANK", "HDFC Bank Ltd."),
    ("INFY", "Infosys Ltd."),
    ("HINDUNILVR", "Hindustan Unilever Ltd."),
    ("ICICIBANK", "ICICI Bank Ltd."),
    ("SBIN", "State Bank of India"),
    ("HDFC", "Housing Development Finance Corporation Ltd."),
    ("BHARTIARTL", "Bharti Airtel Ltd."),
    ("KOTAKBANK", "Kotak Mahindra Bank Ltd."),
    ("ITC", "ITC Ltd."),
    ("BAJFINANCE", "Bajaj Finance Ltd."),
    ("HCLTECH", "HCL Technologies Ltd."),
    ("AXISBANK", "Axis Bank Ltd."),
    ("WIPRO", "Wipro Ltd."),
    ("ASIANPAINT", "Asian Paints Ltd."),
    ("MARUTI", "Maruti Suzuki India Ltd."),
    ("LT", "Larsen & Toubro Ltd."),
    ("ULTRACEMCO", "UltraTech Cement Ltd."),
    ("TITAN", "Titan Company Ltd."),
    ("BAJAJFINSV", "Bajaj Finserv Ltd."),
    ("SUNPHARMA", "Sun Pharmaceutical Industries Ltd."),
    ("ADANIPORTS", "Adani Ports and Special Economic Zone Ltd."),
    ("TATAMOTORS", "Tata Motors Ltd."),
    ("NESTLEIND", "Nestle India Ltd."),
    ("TECHM", "Tech Mahindra Ltd."),
    ("JSWSTEEL", "JSW Steel Ltd."),
    ("TATASTEEL", "Tata Steel Ltd."),
    ("NTPC", "NTPC Ltd."),
    ("POWERGRID", "Power Grid Corporation of India Ltd."),
    ("M&M", "Mahindra & Mahindra Ltd."),
    ("BAJAJ-AUTO", "Bajaj Auto Ltd."),
    ("ONGC", "Oil & Natural Gas Corporation Ltd."),
    ("GRASIM", "Grasim Industries Ltd."),
    ("INDUSINDBK", "IndusInd Bank Ltd."),
    ("BPCL", "Bharat Petroleum Corporation Ltd."),
    ("HDFCLIFE", "HDFC Life Insurance Company Ltd."),
    ("CIPLA", "Cipla Ltd."),
    ("DIVISLAB", "Divi's Laboratories Ltd."),
    ("DRREDDY", "Dr. Reddy's Laboratories Ltd."),
    ("COALINDIA", "Coal India Ltd."),
    ("EICHERMOT", "Eicher Motors Ltd."),
    ("HEROMOTOCO", "Hero MotoCorp Ltd."),
    ("IOC", "Indian Oil Corporation Ltd."),
    ("SBILIFE", "SBI Life Insurance Company Ltd."),
    ("BRITANNIA", "Britannia Industries Ltd."),
    ("UPL", "UPL Ltd."),
    ("HINDALCO", "Hindalco Industries Ltd."),
    ("SHREECEM", "Shree Cement Ltd."),
    ("ADANIENT", "Adani Enterprises Ltd."),
];

/// Constituents in the Nifty 100 beyond the Nifty 50: (symbol, company name)
pub const NIFTY_100_ADDITIONS: &[(&str, &str)] = &[
    ("ACC", "ACC Ltd."),
    ("ADANIGREEN", "Adani Green Energy Ltd."),
    ("AMBUJACEM", "Ambuja Cements Ltd."),
    ("APOLLOHOSP", "Apollo Hospitals Enterprise Ltd."),
    ("AUROPHARMA", "Aurobindo Pharma Ltd."),
    ("BAJAJHLDNG", "Bajaj Holdings & Investment Ltd."),
    ("BANDHANBNK", "Bandhan Bank Ltd."),
    ("BANKBARODA", "Bank of Baroda"),
    ("BERGEPAINT", "Berger Paints India Ltd."),
    ("BIOCON", "Biocon Ltd."),
    ("BOSCHLTD", "Bosch Ltd."),
    ("CHOLAFIN", "Cholamandalam Investment and Finance Company Ltd."),
    ("COLPAL", "Colgate-Palmolive (India) Ltd."),
    ("DABUR", "Dabur India Ltd."),
    ("DLF", "DLF Ltd."),
    ("DMART", "Avenue Supermarts Ltd."),
    ("GAIL", "GAIL (India) Ltd."),
    ("GODREJCP", "Godrej Consumer Products Ltd."),
    ("HAVELLS", "Havells India Ltd."),
    ("HDFCAMC", "HDFC Asset Management Company Ltd."),
    ("ICICIGI", "ICICI Lombard General Insurance Company Ltd."),
    ("ICICIPRULI", "ICICI Prudential Life Insurance Company Ltd."),
    ("IGL", "Indraprastha Gas Ltd."),
    ("INDIGO", "InterGlobe Aviation Ltd."),
    ("INDUSTOWER", "Indus Towers Ltd."),
    ("JINDALSTEL", "Jindal Steel & Power Ltd."),
    ("JUBLFOOD", "Jubilant FoodWorks Ltd."),
    ("LUPIN", "Lupin Ltd."),
    ("MARICO", "Marico Ltd."),
    ("MCDOWELL-N", "United Spirits Ltd."),
    ("MOTHERSUMI", "Motherson Sumi Systems Ltd."),
    ("MUTHOOTFIN", "Muthoot Finance Ltd."),
    ("NAUKRI", "Info Edge (India) Ltd."),
    ("NMDC", "NMDC Ltd."),
    ("PAGEIND", "Page Industries Ltd."),
    ("PEL", "Piramal Enterprises Ltd."),
    ("PETRONET", "Petronet LNG Ltd."),
    ("PIDILITIND", "Pidilite Industries Ltd."),
    ("PIIND", "PI Industries Ltd."),
    ("PNB", "Punjab National Bank"),
    ("SAIL", "Steel Authority of India Ltd."),
    ("SIEMENS", "Siemens Ltd."),
    ("SRF", "SRF Ltd."),
    ("TATACONSUM", "Tata Consumer Products Ltd."),
    ("TATAPOWER", "Tata Power Company Ltd."),
    ("TORNTPHARM", "Torrent Pharmaceuticals Ltd."),
    ("TRENT", "Trent Ltd."),
    ("VEDL", "Vedanta Ltd."),
    ("VOLTAS", "Voltas Ltd."),
    ("YESBANK", "Yes Bank Ltd."),
];

/// Default symbols quoted when the Finnhub exchange listing fails
pub const FINNHUB_DEFAULT_SYMBOLS: &[&str] = &[
    "NSE:RELIANCE",
    "NSE:TCS",
    "NSE:HDFCBANK",
    "NSE:INFY",
    "NSE:ICICIBANK",
    "NSE:SBIN",
    "NSE:HINDUNILVR",
    "NSE:BAJFINANCE",
    "NSE:BHARTIARTL",
    "NSE:KOTAKBANK",
    "NSE:ASIANPAINT",
    "NSE:AXISBANK",
    "NSE:HDFC",
    "NSE:ITC",
    "NSE:TITAN",
    "NSE:HCLTECH",
    "NSE:MARUTI",
    "NSE:ULTRACEMCO",
    "NSE:BAJAJFINSV",
    "NSE:WIPRO",
];

/// Look up the company name for a bare (unprefixed) Nifty 100 symbol
pub fn nifty_company_name(symbol: &str) -> Option<&'static str> {
    NIFTY_50
        .iter()
        .chain(NIFTY_100_ADDITIONS)
        .find(|(sym, _)| *sym == symbol)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nifty_50_has_fifty_constituents() {
        assert_eq!(NIFTY_50.len(), 50);
    }

    #[test]
    fn test_nifty_100_additions_have_fifty_constituents() {
        assert_eq!(NIFTY_100_ADDITIONS.len(), 50);
        for (symbol, _) in NIFTY_100_ADDITIONS {
            assert!(nifty_company_name(symbol).is_some());
            assert!(
                NIFTY_50.iter().all(|(s, _)| s != symbol),
                "{} duplicated across index tables",
                symbol
            );
        }
    }

    #[test]
    fn test_nifty_company_name() {
        assert_eq!(
            nifty_company_name("RELIANCE"),
            Some("Reliance Industries Ltd.")
        );
        assert_eq!(nifty_company_name("DMART"), Some("Avenue Supermarts Ltd."));
        assert_eq!(nifty_company_name("NOTLISTED"), None);
    }

    #[test]
    fn test_finnhub_defaults_are_prefixed() {
        for symbol in FINNHUB_DEFAULT_SYMBOLS {
            assert!(symbol.starts_with(NSE_PREFIX));
        }
    }
}
