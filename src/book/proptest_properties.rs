//! Property-based tests using `proptest` for ledger invariant validation.
//!
//! 1. **Reserve conservation**: pool totals equal bin reserves plus the fee
//!    reserve, and vault balances equal pool totals, after any swap sequence.
//! 2. **Monotone pricing**: a higher bin id never has a lower price.
//! 3. **Fee growth monotonicity**: no bin accumulator ever decreases.
//! 4. **Idempotent settlement**: a second claim with no swap in between pays
//!    nothing.
//! 5. **Determinism**: identical operation sequences produce identical state.
//! 6. **No free liquidity**: deposit then withdraw never returns more than
//!    was paid.
//! 7. **Conservation under mixed operations**: reserves balance, vaults
//!    match pool totals, and each mint's supply across holders and vaults
//!    is unchanged after any interleaving of provide, add, remove,
//!    rebalance, swap and claim.

use proptest::prelude::*;

use super::{
    AddLiquidityParams, LiquidityBook, ModifyLiquidityParams, RemoveLiquidityParams, SwapParams,
};
use crate::config::{BookConfig, PoolConfig};
use crate::domain::{Address, Amount, BasisPoints, BinId, Liquidity, PoolId, PositionId};
use crate::math::price_at_bin;
use crate::traits::OwnershipRegistry;

const MINT_A: Address = Address::from_bytes([1u8; 32]);
const MINT_B: Address = Address::from_bytes([2u8; 32]);
const LP: Address = Address::from_bytes([7u8; 32]);
const TRADER: Address = Address::from_bytes([8u8; 32]);
const FUNDING: u64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn ids(lower: i32, upper: i32) -> Vec<i32> {
    (lower..=upper).step_by(20).collect()
}

/// Book with bins -200..=200 and one position of `per_bin` over all of them.
fn seeded_book(per_bin: u128) -> (LiquidityBook, PoolId, PositionId) {
    let mut book = LiquidityBook::in_memory(BookConfig::default());
    let Ok(pool) = book.initialize_pool(PoolConfig::new(
        MINT_A,
        MINT_B,
        BasisPoints::new(20),
        BasisPoints::new(50),
        0,
    )) else {
        panic!("allowed pool parameters");
    };
    for id in ids(-200, 200) {
        let Ok(_) = book.initialize_bin(pool.id(), id) else {
            panic!("aligned bin");
        };
    }
    for holder in [LP, TRADER] {
        for mint in [MINT_A, MINT_B] {
            let Ok(()) = book.transfers_mut().fund(holder, mint, Amount::new(FUNDING)) else {
                panic!("funding fits");
            };
        }
    }
    let Ok(position) = book.open_position(LP, pool.id(), -200, 200) else {
        panic!("position opens");
    };
    let Ok(_) = book.add_liquidity(&AddLiquidityParams {
        owner: LP,
        pool: pool.id(),
        position: position.id(),
        liquidity_per_bin: Liquidity::new(per_bin),
        max_amount_a: Amount::new(FUNDING),
        max_amount_b: Amount::new(FUNDING),
        bins: ids(-200, 200),
    }) else {
        panic!("liquidity added");
    };
    (book, pool.id(), position.id())
}

/// Swaps along the longest available path; failed swaps are skipped.
fn try_swap(book: &mut LiquidityBook, pool: PoolId, sell_a: bool, amount: u64) {
    let mint_in = if sell_a { MINT_A } else { MINT_B };
    let Ok(bins) = book.swap_path(pool, mint_in, 21) else {
        return;
    };
    let _ = book.swap(&SwapParams {
        trader: TRADER,
        pool,
        mint_in,
        amount_in: Amount::new(amount),
        min_amount_out: Amount::ZERO,
        bins,
    });
}

fn swaps_strategy() -> impl Strategy<Value = Vec<(bool, u64)>> {
    prop::collection::vec((any::<bool>(), 1u64..300_000), 1..12)
}

fn per_bin_strategy() -> impl Strategy<Value = u128> {
    10_000u128..1_000_000
}

// ---------------------------------------------------------------------------
// Mixed operation sequences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    Provide { by_trader: bool, lower: i32, width: i32, per_bin: u128 },
    Add { slot: usize, per_bin: u128 },
    Remove { slot: usize, quarters: u128 },
    Rebalance { slot: usize, lower: i32, width: i32 },
    Swap { sell_a: bool, amount: u64 },
    Claim { slot: usize },
}

/// A live position and the range it covers.
#[derive(Debug, Clone, Copy)]
struct Slot {
    owner: Address,
    id: PositionId,
    lower: i32,
    upper: i32,
}

/// Range of `width` steps starting `lower` steps above bin -200, clipped
/// to the seeded bins.
fn bounds(lower: i32, width: i32) -> (i32, i32) {
    let lower = -200 + 20 * lower;
    (lower, (lower + 20 * width).min(200))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), 0i32..19, 1i32..5, 1_000u128..200_000).prop_map(
            |(by_trader, lower, width, per_bin)| Op::Provide { by_trader, lower, width, per_bin }
        ),
        (any::<usize>(), 1_000u128..200_000).prop_map(|(slot, per_bin)| Op::Add { slot, per_bin }),
        (any::<usize>(), 1u128..=4).prop_map(|(slot, quarters)| Op::Remove { slot, quarters }),
        (any::<usize>(), 0i32..19, 1i32..5)
            .prop_map(|(slot, lower, width)| Op::Rebalance { slot, lower, width }),
        (any::<bool>(), 1u64..300_000).prop_map(|(sell_a, amount)| Op::Swap { sell_a, amount }),
        any::<usize>().prop_map(|slot| Op::Claim { slot }),
    ]
}

fn add(book: &mut LiquidityBook, pool: PoolId, slot: Slot, per_bin: u128) {
    let _ = book.add_liquidity(&AddLiquidityParams {
        owner: slot.owner,
        pool,
        position: slot.id,
        liquidity_per_bin: Liquidity::new(per_bin),
        max_amount_a: Amount::new(FUNDING),
        max_amount_b: Amount::new(FUNDING),
        bins: ids(slot.lower, slot.upper),
    });
}

fn pick(slots: &[Slot], index: usize) -> Option<Slot> {
    slots.get(index.checked_rem(slots.len())?).copied()
}

/// Applies `op`; rejected operations are skipped.
fn apply(book: &mut LiquidityBook, pool: PoolId, slots: &mut Vec<Slot>, op: &Op) {
    match *op {
        Op::Provide { by_trader, lower, width, per_bin } => {
            let owner = if by_trader { TRADER } else { LP };
            let (lower, upper) = bounds(lower, width);
            let Ok(position) = book.open_position(owner, pool, lower, upper) else {
                return;
            };
            let slot = Slot { owner, id: position.id(), lower, upper };
            slots.push(slot);
            add(book, pool, slot, per_bin);
        }
        Op::Add { slot, per_bin } => {
            if let Some(slot) = pick(slots, slot) {
                add(book, pool, slot, per_bin);
            }
        }
        Op::Remove { slot, quarters } => {
            let Some(slot) = pick(slots, slot) else {
                return;
            };
            let Some(held) = book.position(slot.id).map(|p| p.liquidity().get()) else {
                return;
            };
            let _ = book.remove_liquidity(&RemoveLiquidityParams {
                owner: slot.owner,
                pool,
                position: slot.id,
                liquidity: Liquidity::new(held * quarters / 4),
                min_amount_a: Amount::ZERO,
                min_amount_b: Amount::ZERO,
                bins: ids(slot.lower, slot.upper),
            });
        }
        Op::Rebalance { slot, lower, width } => {
            let Some(slot) = pick(slots, slot) else {
                return;
            };
            let (new_lower, new_upper) = bounds(lower, width);
            let Ok(rebalance) = book.modify_liquidity(&ModifyLiquidityParams {
                owner: slot.owner,
                pool,
                position: slot.id,
                new_lower_bin_id: new_lower,
                new_upper_bin_id: new_upper,
                min_surplus_a_out: Amount::ZERO,
                min_surplus_b_out: Amount::ZERO,
                old_bins: ids(slot.lower, slot.upper),
                new_bins: ids(new_lower, new_upper),
            }) else {
                return;
            };
            slots.push(Slot {
                owner: slot.owner,
                id: rebalance.new_position.id(),
                lower: new_lower,
                upper: new_upper,
            });
        }
        Op::Swap { sell_a, amount } => try_swap(book, pool, sell_a, amount),
        Op::Claim { slot } => {
            if let Some(slot) = pick(slots, slot) {
                let _ = book.claim_fees(slot.owner, pool, slot.id, &ids(slot.lower, slot.upper));
            }
        }
    }
}

/// Units of `mint` held by both accounts and the pool's vault.
fn supply(book: &LiquidityBook, vault: Address, mint: Address) -> u128 {
    [LP, TRADER, vault]
        .iter()
        .map(|holder| book.transfers().balance(*holder, mint).as_u128())
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_reserves_are_conserved(
        per_bin in per_bin_strategy(),
        swaps in swaps_strategy(),
    ) {
        let (mut book, pool, _) = seeded_book(per_bin);
        for (sell_a, amount) in swaps {
            try_swap(&mut book, pool, sell_a, amount);
            prop_assert!(book.reserves_balanced(pool));
            let Some(state) = book.pool(pool) else {
                panic!("pool exists");
            };
            prop_assert_eq!(
                book.transfers().balance(state.vault_a(), MINT_A),
                state.reserves_a()
            );
            prop_assert_eq!(
                book.transfers().balance(state.vault_b(), MINT_B),
                state.reserves_b()
            );
        }
    }

    #[test]
    fn prop_price_is_monotone_in_bin_id(
        step in prop::sample::select(vec![1u16, 5, 20, 50, 100, 200]),
        raw in -20_000i32..20_000,
    ) {
        let step_bp = BasisPoints::new(step);
        let aligned = raw - raw.rem_euclid(i32::from(step));
        let (Ok(lower), Ok(upper)) = (
            BinId::new(aligned),
            BinId::new(aligned + i32::from(step)),
        ) else {
            return Ok(());
        };
        let (Ok(low_price), Ok(high_price)) =
            (price_at_bin(lower, step_bp), price_at_bin(upper, step_bp))
        else {
            return Ok(());
        };
        prop_assert!(
            high_price >= low_price,
            "price({}) = {} below price({}) = {}",
            upper.get(), high_price, lower.get(), low_price
        );
    }

    #[test]
    fn prop_fee_growth_never_decreases(
        per_bin in per_bin_strategy(),
        swaps in swaps_strategy(),
    ) {
        let (mut book, pool, _) = seeded_book(per_bin);
        for (sell_a, amount) in swaps {
            let before: Vec<(u128, u128)> = book
                .bins(pool)
                .map(|bin| (bin.fee_growth_per_unit_a(), bin.fee_growth_per_unit_b()))
                .collect();
            try_swap(&mut book, pool, sell_a, amount);
            let after = book
                .bins(pool)
                .map(|bin| (bin.fee_growth_per_unit_a(), bin.fee_growth_per_unit_b()));
            for (old, new) in before.iter().zip(after) {
                prop_assert!(new.0 >= old.0 && new.1 >= old.1);
            }
        }
    }

    #[test]
    fn prop_second_claim_pays_nothing(
        per_bin in per_bin_strategy(),
        swaps in swaps_strategy(),
    ) {
        let (mut book, pool, position) = seeded_book(per_bin);
        for (sell_a, amount) in swaps {
            try_swap(&mut book, pool, sell_a, amount);
        }
        let Ok(_) = book.claim_fees(LP, pool, position, &ids(-200, 200)) else {
            panic!("owner claims");
        };
        let Ok(second) = book.claim_fees(LP, pool, position, &ids(-200, 200)) else {
            panic!("owner claims");
        };
        prop_assert!(second.is_zero());
        prop_assert!(book.reserves_balanced(pool));
    }

    #[test]
    fn prop_identical_sequences_give_identical_state(
        per_bin in per_bin_strategy(),
        swaps in swaps_strategy(),
    ) {
        let (mut first, pool, _) = seeded_book(per_bin);
        let (mut second, _, _) = seeded_book(per_bin);
        for &(sell_a, amount) in &swaps {
            try_swap(&mut first, pool, sell_a, amount);
            try_swap(&mut second, pool, sell_a, amount);
        }
        prop_assert_eq!(first.snapshot(), second.snapshot());
        prop_assert_eq!(first.drain_events(), second.drain_events());
    }

    #[test]
    fn prop_deposit_then_withdraw_never_gains(
        per_bin in per_bin_strategy(),
        swaps in swaps_strategy(),
        extra in 1u128..500_000,
    ) {
        let (mut book, pool, _) = seeded_book(per_bin);
        for (sell_a, amount) in swaps {
            try_swap(&mut book, pool, sell_a, amount);
        }
        let Ok(position) = book.open_position(TRADER, pool, -40, 40) else {
            panic!("position opens");
        };
        let Ok(added) = book.add_liquidity(&AddLiquidityParams {
            owner: TRADER,
            pool,
            position: position.id(),
            liquidity_per_bin: Liquidity::new(extra),
            max_amount_a: Amount::new(FUNDING),
            max_amount_b: Amount::new(FUNDING),
            bins: ids(-40, 40),
        }) else {
            return Ok(());
        };
        let Ok(removed) = book.remove_liquidity(&RemoveLiquidityParams {
            owner: TRADER,
            pool,
            position: position.id(),
            liquidity: added.liquidity,
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            bins: ids(-40, 40),
        }) else {
            panic!("own liquidity is removable");
        };
        prop_assert!(removed.amount_a <= added.amount_a);
        prop_assert!(removed.amount_b <= added.amount_b);
        prop_assert!(removed.fees.is_zero());
        let Some(token) = book.position(position.id()).and_then(|p| p.ownership_token()) else {
            panic!("token minted");
        };
        prop_assert_eq!(book.registry().holder_of(token), Some(TRADER));
    }

    #[test]
    fn prop_mixed_operations_conserve_assets(
        per_bin in per_bin_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..24),
    ) {
        let (mut book, pool, seeded) = seeded_book(per_bin);
        let mut slots = vec![Slot { owner: LP, id: seeded, lower: -200, upper: 200 }];
        let Some(state) = book.pool(pool) else {
            panic!("pool exists");
        };
        let (vault_a, vault_b) = (state.vault_a(), state.vault_b());
        let total = 2 * u128::from(FUNDING);
        prop_assert_eq!(supply(&book, vault_a, MINT_A), total);
        prop_assert_eq!(supply(&book, vault_b, MINT_B), total);

        for op in &ops {
            apply(&mut book, pool, &mut slots, op);
            prop_assert!(book.reserves_balanced(pool), "unbalanced after {:?}", op);
            let Some(state) = book.pool(pool) else {
                panic!("pool exists");
            };
            prop_assert_eq!(book.transfers().balance(vault_a, MINT_A), state.reserves_a());
            prop_assert_eq!(book.transfers().balance(vault_b, MINT_B), state.reserves_b());
            prop_assert_eq!(supply(&book, vault_a, MINT_A), total);
            prop_assert_eq!(supply(&book, vault_b, MINT_B), total);
        }
    }
}
