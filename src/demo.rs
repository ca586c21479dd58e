use std::io::Write;

use anyhow::{Context, Result};
use ringdeque::{RingBuffer, RingError};
use tracing::info;

use crate::report;

/// Walk a buffer of `capacity` slots through every operation, printing the
/// contents after each step. A step the buffer is too short for is reported
/// as skipped and the walk carries on.
pub fn run<W: Write>(capacity: usize, show_indices: bool, out: &mut W) -> Result<()> {
    let mut buffer = RingBuffer::try_new(capacity).context("cannot create the demo buffer")?;
    info!(capacity, "running ring buffer demo");

    let mut step = |label: &str, buffer: &RingBuffer<i32>, outcome: Result<(), RingError>| -> Result<()> {
        match outcome {
            Ok(()) => writeln!(out, "-- {label}")?,
            Err(e) => writeln!(out, "-- {label} (skipped: {e})")?,
        }
        writeln!(out, "{}", report::render(buffer, show_indices))?;
        Ok(())
    };

    buffer.extend([2, 1, 5, 6]);
    step("push_back 2 1 5 6", &buffer, Ok(()))?;

    buffer.push_front(3);
    step("push_front 3", &buffer, Ok(()))?;

    let popped = buffer.pop_back().map(drop);
    step("pop_back", &buffer, popped)?;

    buffer.sort();
    step("sort", &buffer, Ok(()))?;

    let popped = buffer.pop_front().map(drop);
    step("pop_front", &buffer, popped)?;

    buffer.push_front(6);
    step("push_front 6", &buffer, Ok(()))?;

    let second = buffer.begin() + 1;
    let removed = buffer.remove(second).map(drop);
    step("remove begin()+1", &buffer, removed)?;

    let peek = match (buffer.get(1), buffer.at(buffer.begin())) {
        (Some(&indexed), Some(&first)) => Ok((indexed, first)),
        _ => Err(RingError::OutOfRange { offset: 1, len: buffer.len() }),
    };
    match peek {
        Ok((indexed, first)) => {
            step(&format!("buffer[1] = {indexed}, *begin() = {first}"), &buffer, Ok(()))?
        }
        Err(e) => step("buffer[1], *begin()", &buffer, Err(e))?,
    }

    let end = buffer.end();
    let inserted = buffer.insert(end, 4).map(drop);
    step("insert 4 at end()", &buffer, inserted)?;

    match buffer.change_capacity(2) {
        Ok(dropped) => step(&format!("change_capacity 2, dropped {dropped:?}"), &buffer, Ok(()))?,
        Err(e) => step("change_capacity 2", &buffer, Err(e))?,
    }

    Ok(())
}
