use super::*;

#[test]
fn new_token_is_not_cancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
    assert!(token.check().is_ok());
}

#[test]
fn clones_observe_cancellation() {
    let token = CancellationToken::new();
    let clone = token.clone();
    clone.cancel();

    assert!(token.is_cancelled());
    assert!(token.check().expect_err("cancelled").is_cancelled());
}

#[test]
fn from_flag_shares_the_flag() {
    let flag = Arc::new(AtomicBool::new(false));
    let token = CancellationToken::from_flag(Arc::clone(&flag));

    flag.store(true, Ordering::SeqCst);
    assert!(token.is_cancelled());
}

#[test]
fn never_starts_uncancelled_and_owns_its_flag() {
    let token = CancellationToken::never();
    assert!(!token.is_cancelled());
    assert_eq!(Arc::strong_count(&token.flag), 1);
}
