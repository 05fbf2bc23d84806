//! Ratcliff/Obershelp matching ratio and cosine similarity.

use crate::errors::EatError;

/// Gestalt pattern-matching ratio in `[0, 1]`: `2 * M / T`, where `M` is the
/// number of characters in matching blocks and `T` the combined length.
///
/// Two empty strings are identical (ratio 1.0).
pub fn match_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`. Ties go to the
/// block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let width = bhi - blo;
    // run[x] = length of the match ending at a[i - 1], b[blo + x - 1]
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let x = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[x - 1] + 1;
                cur[x] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            } else {
                cur[x] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_k)
}

/// Cosine similarity of two flattened vectors.
///
/// Vectors of different length are rejected. A zero vector has similarity
/// 0.0 with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, EatError> {
    if a.len() != b.len() {
        return Err(EatError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let xf = f64::from(x);
        let yf = f64::from(y);
        dot += xf * yf;
        norm_a += xf * xf;
        norm_b += yf * yf;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_match_ratio_identical_and_disjoint() {
        assert!(approx(match_ratio("dosa", "dosa"), 1.0));
        assert!(approx(match_ratio("abc", "xyz"), 0.0));
        assert!(approx(match_ratio("", ""), 1.0));
        assert!(approx(match_ratio("idli", ""), 0.0));
    }

    #[test]
    fn test_match_ratio_known_values() {
        // "chap" + "ati" = 7 matched characters out of 15
        assert!(approx(match_ratio("chappati", "chapati"), 14.0 / 15.0));
        // blocks "ab" and "d": 2 * 3 / 8
        assert!(approx(match_ratio("abcd", "abxd"), 0.75));
    }

    #[test]
    fn test_match_ratio_does_not_cross_blocks() {
        // Only one of "ab"/"ba" can match in order: longest block is 2 chars
        // (either "ab" or "ba"), the remainder has no overlap.
        assert!(approx(match_ratio("abba", "baab"), 0.5));
    }

    #[test]
    fn test_match_ratio_is_symmetric_for_simple_inputs() {
        let pairs = [("naan", "nan"), ("sambar", "sambhar"), ("vada", "wada")];
        for (a, b) in pairs {
            assert!(approx(match_ratio(a, b), match_ratio(b, a)), "{} / {}", a, b);
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!(approx(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap(), 1.0));
        assert!(approx(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0));
        assert!(approx(cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap(), -1.0));
        assert!(approx(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0));
    }

    #[test]
    fn test_cosine_similarity_rejects_mismatched_dimensions() {
        let err = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, EatError::DimensionMismatch { left: 3, right: 2 }));
    }
}
