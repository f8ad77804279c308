//! Compatibility tiers between MBTI codes.
//!
//! Three fixed tables drive the expansion search: the curated best-match
//! pairs (level 1), the NT↔S "average" mapping (level 3), and the NF↔S
//! "bad" mapping (only reachable at level 4). Level 2 is derived: everyone
//! who is neither best, average, nor bad.

use std::collections::HashSet;

use crate::mbti::Mbti;

/// Analyst group for the NT↔S average mapping.
const NT_GROUP: [Mbti; 4] = [Mbti::INTJ, Mbti::ENTJ, Mbti::INTP, Mbti::ENTP];

/// Sensor group, the counterpart of both the average and the bad mapping.
const S_GROUP: [Mbti; 8] = [
    Mbti::ISFP,
    Mbti::ESFP,
    Mbti::ISTP,
    Mbti::ESTP,
    Mbti::ISFJ,
    Mbti::ESFJ,
    Mbti::ISTJ,
    Mbti::ESTJ,
];

/// Diplomat group for the NF↔S bad mapping.
const NF_GROUP: [Mbti; 4] = [Mbti::INFP, Mbti::ENFP, Mbti::INFJ, Mbti::ENFJ];

/// Curated best-match pairs (level 1).
pub fn best_matches(mbti: Mbti) -> [Mbti; 2] {
    match mbti {
        Mbti::INFP => [Mbti::ENFJ, Mbti::ENTJ],
        Mbti::ENFP => [Mbti::INFJ, Mbti::INTJ],
        Mbti::INFJ => [Mbti::ENFP, Mbti::ENTP],
        Mbti::ENFJ => [Mbti::INFP, Mbti::ISFP],
        Mbti::INTJ => [Mbti::ENFP, Mbti::ENTP],
        Mbti::ENTJ => [Mbti::INFP, Mbti::INTP],
        Mbti::INTP => [Mbti::ENTJ, Mbti::ESTJ],
        Mbti::ENTP => [Mbti::INFJ, Mbti::INTJ],
        Mbti::ISFP => [Mbti::ENFJ, Mbti::ESFJ],
        Mbti::ESFP => [Mbti::ISFJ, Mbti::ISTJ],
        Mbti::ISTP => [Mbti::ESFJ, Mbti::ESTJ],
        Mbti::ESTP => [Mbti::ISFJ, Mbti::ISTJ],
        Mbti::ISFJ => [Mbti::ESFP, Mbti::ESTP],
        Mbti::ESFJ => [Mbti::ISFP, Mbti::ISTP],
        Mbti::ISTJ => [Mbti::ESFP, Mbti::ESTP],
        Mbti::ESTJ => [Mbti::INTP, Mbti::ISTP],
    }
}

/// The "average" tier: NT and S map onto each other, everyone else has none.
fn average_only(mbti: Mbti) -> &'static [Mbti] {
    if NT_GROUP.contains(&mbti) {
        &S_GROUP
    } else if S_GROUP.contains(&mbti) {
        &NT_GROUP
    } else {
        &[]
    }
}

/// Everything excluded from the level-2 "good" tier: the bad mapping
/// (NF↔S, minus the ENFJ↔ISFP best-match exception) plus the average tier.
fn bad_and_average(mbti: Mbti) -> HashSet<Mbti> {
    let mut excluded = HashSet::new();
    if NF_GROUP.contains(&mbti) {
        excluded.extend(S_GROUP);
        if mbti == Mbti::ENFJ {
            excluded.remove(&Mbti::ISFP);
        }
    } else if S_GROUP.contains(&mbti) {
        excluded.extend(NF_GROUP);
        if mbti == Mbti::ISFP {
            excluded.remove(&Mbti::ENFJ);
        }
    }
    excluded.extend(average_only(mbti).iter().copied());
    excluded
}

/// Compatibility targets for `my` at the given expansion level.
///
/// Level 1 returns the best matches; level 2 adds everyone who is neither
/// best, average, nor bad; level 3 adds the average tier; level 4 and above
/// saturate to the full 16-element set. Total for every code and level.
pub fn targets(my: Mbti, level: u8) -> Vec<Mbti> {
    if level >= 4 {
        return Mbti::ALL.to_vec();
    }

    let best = best_matches(my);
    let mut selected: HashSet<Mbti> = best.into_iter().collect();

    if level >= 2 {
        let excluded = bad_and_average(my);
        for candidate in Mbti::ALL {
            if !excluded.contains(&candidate) && !best.contains(&candidate) {
                selected.insert(candidate);
            }
        }
    }

    if level >= 3 {
        selected.extend(average_only(my).iter().copied());
    }

    // Table order keeps the result deterministic; the finder re-sorts by
    // queue size anyway.
    Mbti::ALL
        .into_iter()
        .filter(|m| selected.contains(m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_four_is_the_full_set_for_every_code() {
        for mbti in Mbti::ALL {
            let all = targets(mbti, 4);
            assert_eq!(all.len(), Mbti::COUNT, "{mbti} level 4 must cover everyone");
        }
    }

    #[test]
    fn levels_beyond_four_saturate() {
        assert_eq!(targets(Mbti::INFP, 4), targets(Mbti::INFP, 17));
    }

    #[test]
    fn levels_are_monotonic() {
        for mbti in Mbti::ALL {
            for level in 1..4u8 {
                let narrow = targets(mbti, level);
                let wide = targets(mbti, level + 1);
                for m in &narrow {
                    assert!(
                        wide.contains(m),
                        "{mbti}: level {} lost {m} at level {}",
                        level,
                        level + 1
                    );
                }
            }
        }
    }

    #[test]
    fn level_one_is_exactly_the_best_pairs() {
        for mbti in Mbti::ALL {
            let mut expected = best_matches(mbti).to_vec();
            expected.sort_by_key(|m| m.index());
            let mut got = targets(mbti, 1);
            got.sort_by_key(|m| m.index());
            assert_eq!(got, expected, "{mbti}");
        }
    }

    #[test]
    fn same_type_is_good_for_infp() {
        // INFP is neither its own best match nor in its bad/average set,
        // so it appears in its own level-2 ring.
        assert!(!targets(Mbti::INFP, 1).contains(&Mbti::INFP));
        assert!(targets(Mbti::INFP, 2).contains(&Mbti::INFP));
    }

    #[test]
    fn enfj_isfp_exception_is_best_both_ways() {
        assert!(targets(Mbti::ENFJ, 1).contains(&Mbti::ISFP));
        assert!(targets(Mbti::ISFP, 1).contains(&Mbti::ENFJ));
    }

    #[test]
    fn nf_and_s_only_meet_at_level_four() {
        // INFP (NF) vs ISTJ (S) is the bad mapping: absent until level 4.
        for level in 1..=3u8 {
            assert!(!targets(Mbti::INFP, level).contains(&Mbti::ISTJ));
        }
        assert!(targets(Mbti::INFP, 4).contains(&Mbti::ISTJ));
    }

    #[test]
    fn nt_and_s_meet_at_level_three() {
        // ENTJ (NT) vs ISTJ (S) is the average mapping.
        assert!(!targets(Mbti::ENTJ, 2).contains(&Mbti::ISTJ));
        assert!(targets(Mbti::ENTJ, 3).contains(&Mbti::ISTJ));
    }

    #[test]
    fn best_pairs_are_symmetric() {
        for mbti in Mbti::ALL {
            for partner in best_matches(mbti) {
                assert!(
                    best_matches(partner).contains(&mbti),
                    "{mbti} lists {partner} but not vice versa"
                );
            }
        }
    }
}
