//! Queue notation - expands `T,[IOSZ]p2,*!` style strings into concrete queues.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::Piece;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueParseError {
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("bag opened at {0} is never closed")]
    UnclosedBag(usize),
    #[error("empty bag at {0}")]
    EmptyBag(usize),
    #[error("missing count after 'p' at {0}")]
    MissingCount(usize),
    #[error("cannot draw {count} pieces from a bag of {size}")]
    CountTooLarge { count: usize, size: usize },
    #[error("notation describes up to {count} queues, at most {max} are expanded", max = MAX_QUEUES)]
    TooManyQueues { count: usize },
}

/// Upper bound on the queues one notation may expand to. Every queue is
/// held in memory at once, and `*!*!` alone would be over 25 million.
pub const MAX_QUEUES: usize = 1_000_000;

/// One segment of a queue pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Fixed(Piece),
    Draw { bag: Vec<Piece>, count: usize },
}

fn parse_segments(notation: &str) -> Result<Vec<Segment>, QueueParseError> {
    let chars: Vec<char> = notation.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let bag_start = i;
        let bag = match c {
            ',' => {
                i += 1;
                continue;
            }
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '*' => {
                i += 1;
                "TILJSZO".chars().filter_map(Piece::from_char).collect()
            }
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or(QueueParseError::UnclosedBag(i))?;
                let mut bag = Vec::with_capacity(close);
                for (offset, &ch) in chars[i + 1..i + 1 + close].iter().enumerate() {
                    let piece = Piece::from_char(ch).ok_or(QueueParseError::UnexpectedChar {
                        ch,
                        pos: i + 1 + offset,
                    })?;
                    bag.push(piece);
                }
                i += close + 2;
                bag
            }
            c => {
                let piece =
                    Piece::from_char(c).ok_or(QueueParseError::UnexpectedChar { ch: c, pos: i })?;
                segments.push(Segment::Fixed(piece));
                i += 1;
                continue;
            }
        };
        if bag.is_empty() {
            return Err(QueueParseError::EmptyBag(bag_start));
        }

        let count = match chars.get(i) {
            Some('!') => {
                i += 1;
                bag.len()
            }
            Some('p') | Some('P') => {
                let digits_start = i + 1;
                let mut end = digits_start;
                while end < chars.len() && chars[end].is_ascii_digit() {
                    end += 1;
                }
                let count: usize = chars[digits_start..end]
                    .iter()
                    .collect::<String>()
                    .parse()
                    .map_err(|_| QueueParseError::MissingCount(i))?;
                i = end;
                count
            }
            _ => 1,
        };
        if count > bag.len() {
            return Err(QueueParseError::CountTooLarge {
                count,
                size: bag.len(),
            });
        }
        segments.push(Segment::Draw { bag, count });
    }
    Ok(segments)
}

/// Queue count before duplicates are removed, saturating.
fn queue_bound(segments: &[Segment]) -> usize {
    segments.iter().fold(1usize, |acc, segment| match segment {
        Segment::Fixed(_) => acc,
        Segment::Draw { bag, count } => (bag.len() + 1 - count..=bag.len())
            .fold(acc, |acc, n| acc.saturating_mul(n)),
    })
}

/// Every ordered selection of `count` entries from `bag`, each entry used at most once.
fn draws(bag: &[Piece], count: usize) -> BTreeSet<Vec<Piece>> {
    fn go(
        bag: &[Piece],
        used: &mut Vec<bool>,
        prefix: &mut Vec<Piece>,
        count: usize,
        out: &mut BTreeSet<Vec<Piece>>,
    ) {
        if prefix.len() == count {
            out.insert(prefix.clone());
            return;
        }
        for i in 0..bag.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            prefix.push(bag[i]);
            go(bag, used, prefix, count, out);
            prefix.pop();
            used[i] = false;
        }
    }

    let mut out = BTreeSet::new();
    go(
        bag,
        &mut vec![false; bag.len()],
        &mut Vec::with_capacity(count),
        count,
        &mut out,
    );
    out
}

/// Expand queue notation into every concrete queue it describes, sorted and
/// without duplicates.
///
/// Piece letters are taken as-is, `[..]` picks one piece from a bag, `[..]pN`
/// draws N distinct bag entries in every order, `[..]!` draws the whole bag,
/// and `*` stands for the bag of all seven pieces. Commas and whitespace only
/// separate.
///
/// The whole set is built in memory, so notations that could produce more
/// than [`MAX_QUEUES`] queues are rejected before any expansion.
pub fn expand_queue(notation: &str) -> Result<Vec<Vec<Piece>>, QueueParseError> {
    let segments = parse_segments(notation)?;
    let count = queue_bound(&segments);
    if count > MAX_QUEUES {
        return Err(QueueParseError::TooManyQueues { count });
    }
    let mut queues: BTreeSet<Vec<Piece>> = BTreeSet::new();
    queues.insert(Vec::new());
    for segment in segments {
        queues = match segment {
            Segment::Fixed(piece) => queues
                .into_iter()
                .map(|mut q| {
                    q.push(piece);
                    q
                })
                .collect(),
            Segment::Draw { bag, count } => {
                let tails = draws(&bag, count);
                queues
                    .iter()
                    .flat_map(|q| {
                        tails.iter().map(move |tail| {
                            let mut q = q.clone();
                            q.extend_from_slice(tail);
                            q
                        })
                    })
                    .collect()
            }
        };
    }
    queues.retain(|q| !q.is_empty());
    Ok(queues.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use Piece::*;

    #[test]
    fn test_fixed_letters() {
        assert_eq!(expand_queue("TIO").unwrap(), vec![vec![T, I, O]]);
        assert_eq!(expand_queue("t, i ,o").unwrap(), vec![vec![T, I, O]]);
    }

    #[test]
    fn test_single_pick() {
        let queues = expand_queue("T[IO]").unwrap();
        assert_eq!(queues, vec![vec![T, I], vec![T, O]]);
    }

    #[test]
    fn test_permutation_count() {
        assert_eq!(expand_queue("[IOT]p2").unwrap().len(), 6);
        assert_eq!(expand_queue("[IOT]!").unwrap().len(), 6);
        assert_eq!(expand_queue("*!").unwrap().len(), 5040);
        assert_eq!(expand_queue("*p2").unwrap().len(), 42);
    }

    #[test]
    fn test_duplicate_bag_entries_dedupe() {
        let queues = expand_queue("[TTI]!").unwrap();
        assert_eq!(
            queues,
            vec![vec![I, T, T], vec![T, I, T], vec![T, T, I]]
        );
    }

    #[test]
    fn test_segments_compose() {
        let queues = expand_queue("[IO],[SZ]p2").unwrap();
        assert_eq!(queues.len(), 4);
        assert!(queues.contains(&vec![O, Z, S]));
    }

    #[test]
    fn test_empty_notation() {
        assert!(expand_queue("").unwrap().is_empty());
        assert!(expand_queue(" , ").unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            expand_queue("TQ"),
            Err(QueueParseError::UnexpectedChar { ch: 'Q', pos: 1 })
        );
        assert_eq!(expand_queue("[IO"), Err(QueueParseError::UnclosedBag(0)));
        assert_eq!(expand_queue("T[]"), Err(QueueParseError::EmptyBag(1)));
        assert_eq!(expand_queue("[IO]p"), Err(QueueParseError::MissingCount(4)));
        assert_eq!(
            expand_queue("[IO]p3"),
            Err(QueueParseError::CountTooLarge { count: 3, size: 2 })
        );
    }

    #[test]
    fn test_queue_limit() {
        assert_eq!(
            expand_queue("*!*!"),
            Err(QueueParseError::TooManyQueues { count: 25_401_600 })
        );
        assert_eq!(
            expand_queue("*!*!*!*!*!*!").unwrap_err().to_string(),
            format!("notation describes up to {} queues, at most 1000000 are expanded", usize::MAX)
        );
        // 5040 * 42 stays under the limit
        assert_eq!(expand_queue("*!*p2").unwrap().len(), 211_680);
    }
}
