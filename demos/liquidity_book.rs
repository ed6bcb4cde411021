//! Liquidity book walkthrough.
//!
//! Creates a pool, opens two positions over different bin ranges, trades
//! across bins in both directions, claims fees, recentres a position on
//! the new active bin and finally withdraws everything.
//!
//! # Run
//!
//! ```bash
//! cargo run --example liquidity_book
//! ```

use liquidity_book::LiquidityBook;
use liquidity_book::book::{
    AddLiquidityParams, ModifyLiquidityParams, RemoveLiquidityParams, SwapParams,
};
use liquidity_book::config::{BookConfig, PoolConfig};
use liquidity_book::domain::{Address, Amount, BasisPoints, Liquidity};

fn ids(lower: i32, upper: i32) -> Vec<i32> {
    (lower..=upper).step_by(20).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Liquidity Book ===\n");

    // ── 1. Assets and participants ─────────────────────────────────────
    let usdc = Address::from_bytes([1u8; 32]);
    let weth = Address::from_bytes([2u8; 32]);
    let alice = Address::from_bytes([0xa1; 32]);
    let bob = Address::from_bytes([0xb0; 32]);
    let trader = Address::from_bytes([0x7e; 32]);

    // ── 2. Pool with 20 bp bins and a 0.50% fee ────────────────────────
    let mut book = LiquidityBook::in_memory(BookConfig::default());
    let pool = book
        .initialize_pool(PoolConfig::new(
            usdc,
            weth,
            BasisPoints::new(20),
            BasisPoints::new(50),
            0,
        ))?
        .id();
    for id in ids(-200, 200) {
        book.initialize_bin(pool, id)?;
    }
    for holder in [alice, bob, trader] {
        for mint in [usdc, weth] {
            book.transfers_mut().fund(holder, mint, Amount::new(100_000_000))?;
        }
    }
    println!("Pool {pool} created with bins -200..=200");
    println!(
        "  price(-200) = {}, price(0) = {}, price(200) = {}\n",
        book.get_price(pool, -200)?,
        book.get_price(pool, 0)?,
        book.get_price(pool, 200)?
    );

    // ── 3. Two positions ───────────────────────────────────────────────
    let wide = book.open_position(alice, pool, -200, 200)?.id();
    let added = book.add_liquidity(&AddLiquidityParams {
        owner: alice,
        pool,
        position: wide,
        liquidity_per_bin: Liquidity::new(500_000),
        max_amount_a: Amount::new(10_000_000),
        max_amount_b: Amount::new(10_000_000),
        bins: ids(-200, 200),
    })?;
    println!(
        "Alice {wide} over [-200, 200]: paid {} USDC + {} WETH",
        added.amount_a, added.amount_b
    );

    let narrow = book.open_position(bob, pool, -40, 40)?.id();
    let added = book.add_liquidity(&AddLiquidityParams {
        owner: bob,
        pool,
        position: narrow,
        liquidity_per_bin: Liquidity::new(2_000_000),
        max_amount_a: Amount::new(10_000_000),
        max_amount_b: Amount::new(10_000_000),
        bins: ids(-40, 40),
    })?;
    println!(
        "Bob   {narrow} over [-40, 40]:   paid {} USDC + {} WETH\n",
        added.amount_a, added.amount_b
    );

    // ── 4. Trades ──────────────────────────────────────────────────────
    for (mint, amount) in [(usdc, 4_000_000), (weth, 6_000_000), (usdc, 1_500_000)] {
        let quote_path = book.swap_path(pool, mint, 21)?;
        let outcome = book.swap(&SwapParams {
            trader,
            pool,
            mint_in: mint,
            amount_in: Amount::new(amount),
            min_amount_out: Amount::new(1),
            bins: quote_path,
        })?;
        println!(
            "Swap {}: in {} (fee {}), out {}, bins {} -> {} ({} traded)",
            outcome.direction,
            outcome.amount_in,
            outcome.fee,
            outcome.amount_out,
            outcome.start_bin,
            outcome.end_bin,
            outcome.bins_traded
        );
    }
    println!();

    // ── 5. Fees ────────────────────────────────────────────────────────
    let alice_fees = book.claim_fees(alice, pool, wide, &ids(-200, 200))?;
    let bob_fees = book.claim_fees(bob, pool, narrow, &ids(-40, 40))?;
    println!(
        "Fees claimed: Alice {} USDC + {} WETH, Bob {} USDC + {} WETH\n",
        alice_fees.fee_a, alice_fees.fee_b, bob_fees.fee_a, bob_fees.fee_b
    );

    // ── 6. Bob recentres on the active bin ─────────────────────────────
    let active = book
        .pool(pool)
        .map(|p| p.active_bin_id().get())
        .ok_or("pool disappeared")?;
    let rebalance = book.modify_liquidity(&ModifyLiquidityParams {
        owner: bob,
        pool,
        position: narrow,
        new_lower_bin_id: active - 40,
        new_upper_bin_id: active + 40,
        min_surplus_a_out: Amount::ZERO,
        min_surplus_b_out: Amount::ZERO,
        old_bins: ids(-40, 40),
        new_bins: ids(active - 40, active + 40),
    })?;
    println!(
        "Bob moved {} liquidity to {} over [{}, {}], {} per bin; surplus {} USDC + {} WETH",
        rebalance.liquidity_moved,
        rebalance.new_position.id(),
        active - 40,
        active + 40,
        rebalance.liquidity_per_bin,
        rebalance.surplus_a,
        rebalance.surplus_b
    );
    book.burn_empty_position(bob, pool, narrow)?;

    // ── 7. Exit ────────────────────────────────────────────────────────
    let exits = [
        (alice, wide, ids(-200, 200)),
        (bob, rebalance.new_position.id(), ids(active - 40, active + 40)),
    ];
    for (owner, position, bins) in exits {
        let liquidity = book
            .position(position)
            .map(|p| p.liquidity())
            .ok_or("position disappeared")?;
        let receipt = book.remove_liquidity(&RemoveLiquidityParams {
            owner,
            pool,
            position,
            liquidity,
            min_amount_a: Amount::ZERO,
            min_amount_b: Amount::ZERO,
            bins,
        })?;
        book.burn_empty_position(owner, pool, position)?;
        println!(
            "{position} withdrawn: {} USDC + {} WETH",
            receipt.amount_a, receipt.amount_b
        );
    }

    println!(
        "\nReserves balanced: {}, events recorded: {}",
        book.reserves_balanced(pool),
        book.drain_events().len()
    );
    Ok(())
}
