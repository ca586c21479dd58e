use std::fmt::Display;

use ringdeque::RingBuffer;

/// Render the logical contents as `Elements: a b c`, followed by a
/// `Head: h Tail: t` line when `show_indices` is set.
pub fn render<T: Display>(buffer: &RingBuffer<T>, show_indices: bool) -> String {
    let mut out = String::from("Elements:");
    for item in buffer {
        out.push(' ');
        out.push_str(&item.to_string());
    }
    if show_indices {
        out.push_str(&format!("\nHead: {} Tail: {}", buffer.head(), buffer.tail()));
    }
    out
}
