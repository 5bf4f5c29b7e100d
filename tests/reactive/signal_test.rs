/*!
 * Signal Tests
 * Always-notify semantics and subscription lifetimes
 */

use parking_lot::Mutex;
use std::sync::Arc;

use reactive_vfs::reactive::Signal;

#[test]
fn test_set_notifies_even_when_equal() {
    let signal = Signal::new(1);
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    let _sub = signal.subscribe(move |_| *sink.lock() += 1);

    signal.set(1);
    signal.set(1);

    assert_eq!(*count.lock(), 2);
    assert_eq!(signal.version(), 2);
}

#[test]
fn test_subscription_drop_and_detach() {
    let signal = Signal::new(String::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let dropped = signal.subscribe(move |v: &String| sink.lock().push(format!("a:{}", v)));
    let sink = Arc::clone(&seen);
    signal
        .subscribe(move |v: &String| sink.lock().push(format!("b:{}", v)))
        .detach();

    signal.set("1".into());
    drop(dropped);
    signal.set("2".into());

    assert_eq!(seen.lock().as_slice(), &["a:1", "b:1", "b:2"]);
    assert_eq!(signal.subscriber_count(), 1);
}

#[test]
fn test_subscriber_may_write_other_signal() {
    let source = Signal::new(0);
    let mirror = Signal::new(0);
    let target = mirror.clone();
    let _sub = source.subscribe(move |v| target.set(*v * 10));

    source.set(4);
    assert_eq!(mirror.get(), 40);
}

#[test]
fn test_clones_share_state() {
    let a = Signal::new(vec![1]);
    let b = a.clone();
    b.update(|v| {
        let mut next = v.clone();
        next.push(2);
        next
    });
    assert!(a.ptr_eq(&b));
    assert_eq!(a.get(), vec![1, 2]);
}
