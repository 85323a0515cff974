//! Levenshtein edit distance

/// Edit distance between `a` and `b` with unit insert, delete and
/// substitute costs. Operates on Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Single-row DP over the shorter-dimension table.
    let mut row: Vec<u32> = (0..=b.len() as u32).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i as u32 + 1;
        for (j, &cb) in b.iter().enumerate() {
            let sub = diag + if ca == cb { 0 } else { 1 };
            diag = row[j + 1];
            row[j + 1] = sub.min(row[j] + 1).min(diag + 1);
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_strings() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_classic_cases() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("Dorpsstraat", "Dorpsstraat"), 0);
        assert_eq!(levenshtein("Dorpsstraat", "Dorpstraat"), 1);
    }

    #[test]
    fn test_symmetry() {
        assert_eq!(levenshtein("Het ", "Hel "), levenshtein("Hel ", "Het "));
        assert_eq!(levenshtein("De ", "Oe "), 1);
    }
}
