//! Display formatting for local-currency amounts.

use rust_decimal::Decimal;
use salary_core::calculations::common::{round_one_dp, round_whole};

const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Display prefix for a currency code. Codes without a dedicated symbol
/// are shown as the code followed by a space.
pub fn currency_symbol(code: &str) -> String {
    let symbol = match code {
        "USD" => "$",
        "GBP" => "£",
        "EUR" => "€",
        "JPY" | "CNY" => "¥",
        "CHF" => "CHF ",
        "AUD" => "A$",
        "CAD" => "C$",
        "SGD" => "S$",
        "HKD" => "HK$",
        "NZD" => "NZ$",
        "SEK" | "NOK" | "DKK" => "kr ",
        "CZK" => "Kč ",
        "HUF" => "Ft ",
        "PLN" => "zł ",
        "TRY" => "₺",
        "BRL" => "R$",
        "MXN" => "MX$",
        "ZAR" => "R ",
        "KRW" => "₩",
        "TWD" => "NT$",
        "IDR" => "Rp ",
        "VND" => "₫",
        "PHP" => "₱",
        "ILS" => "₪",
        "EGP" => "E£",
        "KES" => "KSh ",
        "NGN" => "₦",
        "MAD" => "MAD ",
        "ARS" => "AR$",
        "COP" => "CO$",
        "PEN" => "S/",
        "CLP" => "CL$",
        "UYU" => "$U ",
        "CRC" => "₡",
        "QAR" => "QR ",
        "SAR" => "SR ",
        "PAB" => "B/",
        "RON" => "lei ",
        "AED" => "AED ",
        "INR" => "₹",
        "MYR" => "RM ",
        "THB" => "฿",
        other => return format!("{other} "),
    };
    symbol.to_string()
}

/// Formats `amount` rounded to whole units.
///
/// Amounts of a million or more are abbreviated to one decimal of
/// millions; smaller amounts get comma thousands separators.
///
/// ```
/// use rust_decimal_macros::dec;
/// use salary_site::currency::format_currency;
///
/// assert_eq!(format_currency(dec!(84213.6), "EUR"), "€84,214");
/// assert_eq!(format_currency(dec!(12650000), "JPY"), "¥12.7M");
/// assert_eq!(format_currency(dec!(950), "XYZ"), "XYZ 950");
/// ```
pub fn format_currency(
    amount: Decimal,
    currency: &str,
) -> String {
    let symbol = currency_symbol(currency);
    let rounded = round_whole(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let magnitude = rounded.abs();

    if magnitude >= MILLION {
        let millions = round_one_dp(magnitude / MILLION);
        return format!("{sign}{symbol}{millions:.1}M");
    }
    format!("{sign}{symbol}{}", group_thousands(&format!("{magnitude:.0}")))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_known_symbols() {
        assert_eq!(currency_symbol("USD"), "$");
        assert_eq!(currency_symbol("CHF"), "CHF ");
        assert_eq!(currency_symbol("CNY"), "¥");
        assert_eq!(currency_symbol("DKK"), "kr ");
    }

    #[test]
    fn test_unknown_symbol_falls_back_to_code() {
        assert_eq!(currency_symbol("XOF"), "XOF ");
    }

    // =========================================================================
    // format_currency
    // =========================================================================

    #[test]
    fn test_small_amounts() {
        assert_eq!(format_currency(dec!(0), "USD"), "$0");
        assert_eq!(format_currency(dec!(999.4), "USD"), "$999");
        assert_eq!(format_currency(dec!(999.5), "USD"), "$1,000");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_currency(dec!(1234), "GBP"), "£1,234");
        assert_eq!(format_currency(dec!(65000), "GBP"), "£65,000");
        assert_eq!(format_currency(dec!(999999.4), "AED"), "AED 999,999");
    }

    #[test]
    fn test_millions_abbreviated() {
        assert_eq!(format_currency(dec!(1000000), "JPY"), "¥1.0M");
        assert_eq!(format_currency(dec!(999999.5), "JPY"), "¥1.0M");
        assert_eq!(format_currency(dec!(1250000), "KRW"), "₩1.3M");
        assert_eq!(format_currency(dec!(47860000), "IDR"), "Rp 47.9M");
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(format_currency(dec!(-1500), "EUR"), "-€1,500");
        assert_eq!(format_currency(dec!(-0.2), "EUR"), "€0");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
