use crate::types::Cost;

// Format a raw USD amount for display ("<$0.001", "$0.0030", "$0.060", "$7.68")
pub fn format_cost(value: f64) -> String {
    Cost::new(value).to_formatted_string()
}

// Format number with thousands separator
pub fn format_number_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;

    for c in s.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cost_tiers() {
        assert_eq!(format_cost(0.0002), "<$0.001");
        assert_eq!(format_cost(0.003), "$0.0030");
        assert_eq!(format_cost(0.06), "$0.060");
        assert_eq!(format_cost(7.68), "$7.68");
    }

    #[test]
    fn test_format_number_with_commas() {
        assert_eq!(format_number_with_commas(0), "0");
        assert_eq!(format_number_with_commas(999), "999");
        assert_eq!(format_number_with_commas(1000), "1,000");
        assert_eq!(format_number_with_commas(1234567), "1,234,567");
    }
}
