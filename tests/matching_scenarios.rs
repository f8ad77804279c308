//! End-to-end partner-search scenarios against the in-memory queue.
//!
//! Each test seeds one queue shape and drives the finder the way the
//! coordinator does, checking tier expansion, the load-balancing rule, and
//! ghost handling.

use std::sync::Arc;

use mbti_match::finder::MatchFinder;
use mbti_match::mbti::Mbti;
use mbti_match::ports::MatchQueue;
use mbti_match::queue::InMemoryMatchQueue;
use mbti_match::types::MatchTicket;

fn setup() -> (Arc<InMemoryMatchQueue>, MatchFinder) {
    let queue = Arc::new(InMemoryMatchQueue::new());
    let finder = MatchFinder::new(queue.clone());
    (queue, finder)
}

fn ticket(user_id: &str, mbti: Mbti) -> MatchTicket {
    MatchTicket::new(user_id, mbti).unwrap()
}

#[tokio::test]
async fn level_expansion_finds_good_partner_only_at_level_two() {
    // INFP's best matches are absent; only a "good" INTP is waiting.
    let (queue, finder) = setup();
    queue.enqueue(&ticket("partner_intp", Mbti::INTP)).await.unwrap();

    let me = ticket("me_infp", Mbti::INFP);

    // Level 1 searches best matches only.
    assert!(finder.find_partner(&me, 1).await.unwrap().is_none());

    // Level 2 widens to the good ring.
    let partner = finder.find_partner(&me, 2).await.unwrap().unwrap();
    assert_eq!(partner.user_id, "partner_intp");
    assert_eq!(partner.mbti, Mbti::INTP);
}

#[tokio::test]
async fn worst_pairing_only_reachable_at_level_four() {
    // ISTJ is INFP's worst tier: invisible until the full expansion.
    let (queue, finder) = setup();
    queue.enqueue(&ticket("partner_istj", Mbti::ISTJ)).await.unwrap();

    let me = ticket("me_infp", Mbti::INFP);

    assert!(finder.find_partner(&me, 1).await.unwrap().is_none());
    assert!(finder.find_partner(&me, 2).await.unwrap().is_none());
    assert!(finder.find_partner(&me, 3).await.unwrap().is_none());

    let partner = finder.find_partner(&me, 4).await.unwrap().unwrap();
    assert_eq!(partner.user_id, "partner_istj");
}

#[tokio::test]
async fn cancelled_ghost_is_skipped_and_never_matched() {
    let (queue, finder) = setup();

    // First waiter cancels; the set entry goes, the sequence entry stays.
    queue.enqueue(&ticket("ghost_user", Mbti::ENFJ)).await.unwrap();
    assert!(queue.cancel("ghost_user", Mbti::ENFJ).await.unwrap());

    queue.enqueue(&ticket("real_user", Mbti::ENFJ)).await.unwrap();

    let me = ticket("me_infp", Mbti::INFP);
    let partner = finder.find_partner(&me, 1).await.unwrap().unwrap();
    assert_eq!(partner.user_id, "real_user");

    // The ghost was collected on the way; nothing is left waiting.
    assert_eq!(queue.size(Mbti::ENFJ).await.unwrap(), 0);
}

#[tokio::test]
async fn fuller_queue_wins_within_one_tier() {
    // Both ENFJ and ENTJ are best matches for INFP; ENTJ has more waiters.
    let (queue, finder) = setup();
    queue.enqueue(&ticket("enfj_solo", Mbti::ENFJ)).await.unwrap();
    queue.enqueue(&ticket("entj_1", Mbti::ENTJ)).await.unwrap();
    queue.enqueue(&ticket("entj_2", Mbti::ENTJ)).await.unwrap();
    queue.enqueue(&ticket("entj_3", Mbti::ENTJ)).await.unwrap();

    let me = ticket("me_infp", Mbti::INFP);
    let partner = finder.find_partner(&me, 1).await.unwrap().unwrap();
    assert_eq!(partner.mbti, Mbti::ENTJ);
}

#[tokio::test]
async fn fuller_queue_wins_even_across_tiers() {
    // ENFJ is a best match for INFP but INTP (good tier) has the longer
    // queue: congestion relief beats tier preference at level 2.
    let (queue, finder) = setup();
    queue.enqueue(&ticket("best_enfj", Mbti::ENFJ)).await.unwrap();
    queue.enqueue(&ticket("good_intp_1", Mbti::INTP)).await.unwrap();
    queue.enqueue(&ticket("good_intp_2", Mbti::INTP)).await.unwrap();

    let me = ticket("me_infp", Mbti::INFP);
    let partner = finder.find_partner(&me, 2).await.unwrap().unwrap();
    assert_eq!(partner.mbti, Mbti::INTP);
}

#[tokio::test]
async fn enfj_isfp_exception_matches_at_level_one() {
    // NF↔S is normally the worst tier, but ENFJ↔ISFP is curated as best.
    let (queue, finder) = setup();
    queue.enqueue(&ticket("isfp_user", Mbti::ISFP)).await.unwrap();

    let me = ticket("me_enfj", Mbti::ENFJ);
    let partner = finder.find_partner(&me, 1).await.unwrap().unwrap();
    assert_eq!(partner.mbti, Mbti::ISFP);
}

#[tokio::test]
async fn same_type_is_good_tier() {
    // INFP with INFP: not best, but inside the level-2 ring.
    let (queue, finder) = setup();
    queue.enqueue(&ticket("other_infp", Mbti::INFP)).await.unwrap();

    let me = ticket("me_infp", Mbti::INFP);

    assert!(finder.find_partner(&me, 1).await.unwrap().is_none());

    let partner = finder.find_partner(&me, 2).await.unwrap().unwrap();
    assert_eq!(partner.user_id, "other_infp");
}

#[tokio::test]
async fn nt_and_s_pair_at_level_three() {
    // ENTJ (NT) and ISTJ (S) sit in the average tier.
    let (queue, finder) = setup();
    queue.enqueue(&ticket("istj_user", Mbti::ISTJ)).await.unwrap();

    let me = ticket("me_entj", Mbti::ENTJ);

    assert!(finder.find_partner(&me, 2).await.unwrap().is_none());

    let partner = finder.find_partner(&me, 3).await.unwrap().unwrap();
    assert_eq!(partner.mbti, Mbti::ISTJ);
}

#[tokio::test]
async fn queue_depletes_in_fifo_order() {
    let (queue, finder) = setup();
    queue.enqueue(&ticket("enfj_1", Mbti::ENFJ)).await.unwrap();
    queue.enqueue(&ticket("enfj_2", Mbti::ENFJ)).await.unwrap();

    let me = ticket("me_infp", Mbti::INFP);

    let first = finder.find_partner(&me, 1).await.unwrap().unwrap();
    assert_eq!(first.user_id, "enfj_1");

    let second = finder.find_partner(&me, 1).await.unwrap().unwrap();
    assert_eq!(second.user_id, "enfj_2");

    assert!(finder.find_partner(&me, 1).await.unwrap().is_none());
}
