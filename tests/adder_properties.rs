use bitadd::add_no_arithmetic;
use bitadd::adder::{add_recursive, add_words, trace_add};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn documented_scenarios() {
    assert_eq!(add_no_arithmetic(3, 5), 8);
    assert_eq!(add_no_arithmetic(0, 0), 0);
    assert_eq!(add_no_arithmetic(15, 17), 32);
    assert_eq!(add_no_arithmetic(-5, 3), -2);
    assert_eq!(add_no_arithmetic(-7, -8), -15);
    assert_eq!(add_no_arithmetic(2147483647, 1), -2147483648);
}

#[test]
fn random_i32_pairs_match_native_addition() {
    let mut rng = StdRng::seed_from_u64(0xB17_ADD);
    for _ in 0..50_000 {
        let a: i32 = rng.random();
        let b: i32 = rng.random();
        assert_eq!(add_no_arithmetic(a, b), a.wrapping_add(b), "{a} + {b}");
        assert_eq!(add_no_arithmetic(a, b), add_no_arithmetic(b, a));
        assert_eq!(add_no_arithmetic(a, 0), a);
        assert_eq!(add_recursive(a, b), a.wrapping_add(b));
    }
}

#[test]
fn random_i64_pairs_match_native_addition() {
    let mut rng = StdRng::seed_from_u64(64);
    for _ in 0..20_000 {
        let a: i64 = rng.random();
        let b: i64 = rng.random();
        assert_eq!(add_words(a, b), a.wrapping_add(b), "{a} + {b}");
    }
}

#[test]
fn worst_case_carry_chain_stays_within_width() {
    // -1 + 1 carries through every bit position
    let trace = trace_add(-1i32, 1i32);
    assert_eq!(trace.sum, 0);
    assert_eq!(trace.steps.len(), 32);
    assert_eq!(trace.steps.last().unwrap().carry, 0);
}

#[test]
fn adder_is_safe_to_share_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|t| {
            std::thread::spawn(move || {
                (0..1_000)
                    .map(|i| add_no_arithmetic(i * t, -i))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    for (t, handle) in handles.into_iter().enumerate() {
        let sums = handle.join().unwrap();
        let t = t as i32;
        for (i, sum) in sums.into_iter().enumerate() {
            let i = i as i32;
            assert_eq!(sum, (i * t).wrapping_sub(i));
        }
    }
}
