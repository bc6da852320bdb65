// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use guardstack::testing::Target;
use guardstack::{report, FixedStack, FrameLayout, GrowthPolicy, GuardedStack, Snapshot, Stack};
use guardstack::{Storage, StackError};

mod cli;
use cli::display::{print_dump, print_layout};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Demo { capacity, pushes } => run_demo(capacity, pushes, cli.json),
        Commands::Tamper {
            field,
            pushes,
            fixed,
        } => {
            if fixed {
                let mut stack: FixedStack<u64, 8> = FixedStack::new();
                run_tamper(&mut stack, field.into(), pushes, cli.json)
            } else {
                let mut stack: Stack<u64> = Stack::with_capacity(8);
                run_tamper(&mut stack, field.into(), pushes, cli.json)
            }
        }
        Commands::Layout { width, capacity } => run_layout(width, capacity, cli.json),
    }
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn show(snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", report::to_json(snapshot).context("serializing dump")?);
    } else {
        print_dump(snapshot);
    }
    Ok(())
}

fn show_error(err: &StackError, json: bool) -> Result<()> {
    match err.snapshot() {
        Some(snapshot) => show(snapshot, json),
        None => bail!("{err}"),
    }
}

/// Grow past capacity, drain, then pop once more.
fn run_demo(capacity: usize, pushes: u32, json: bool) -> Result<()> {
    let mut stack: Stack<u64> = Stack::with_capacity(capacity);
    for value in 0..pushes {
        stack.push(u64::from(value) * 10)?;
    }
    info!(
        stack = %stack.id(),
        len = stack.len(),
        capacity = stack.capacity(),
        "pushed values"
    );
    if !json {
        println!(
            "pushed {} values: capacity {} -> {}",
            pushes,
            capacity,
            stack.capacity()
        );
    }

    let mut popped = Vec::with_capacity(stack.len());
    while !stack.is_empty() {
        popped.push(stack.pop()?);
    }
    if !json {
        println!("drained in LIFO order: {:?}", popped);
    }

    match stack.pop() {
        Ok(value) => bail!("pop on an empty stack returned {value}"),
        Err(err) => show_error(&err, json),
    }
}

fn run_tamper<S, P>(
    stack: &mut GuardedStack<u64, S, P>,
    target: Target,
    pushes: u32,
    json: bool,
) -> Result<()>
where
    S: Storage,
    P: GrowthPolicy<S>,
{
    for value in 0..pushes {
        stack
            .push(u64::from(value) + 1)
            .with_context(|| format!("pushing value {}", value + 1))?;
    }

    if !target.apply(stack) {
        bail!("{target:?} has nothing to damage with {pushes} values pushed");
    }

    match stack.verify() {
        Ok(report) => bail!("damage to {target:?} went undetected: {report:?}"),
        Err(err) => show_error(&err, json),
    }
}

fn run_layout(width: usize, capacity: usize, json: bool) -> Result<()> {
    let Some(layout) = FrameLayout::checked(width, capacity) else {
        bail!("{capacity} slots of {width} bytes do not fit in memory");
    };

    if json {
        let value = serde_json::json!({
            "slot_width": layout.slot_width(),
            "capacity": layout.capacity(),
            "payload_offset": guardstack::layout::PAYLOAD_POS,
            "trailer_offset": layout.trailer_pos(),
            "total_size": layout.total_size(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_layout(&layout);
    }
    Ok(())
}
