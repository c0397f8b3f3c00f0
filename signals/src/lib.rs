/*!
Latest-value signals and push operators for the contact book state graphs

# Design requirements:
- Writers and readers are different types. A [`Mut`] can submit and close; a [`Read`] can only be observed or derived from
- Delivery is synchronous and in registration order; every observer sees a signal's values in submission order
- Observing returns a [`SubscriptionGuard`] that releases the whole upstream chain when disposed or dropped
- Operators are eager and owned by their output: dropping the last handle to a derived signal cancels its timers and tasks
- Closing is terminal. A closed latest-value signal still replays its last value, then `Done`

# Nomenclature:
- latest-value signal - remembers its last value and replays it to every new observer ([`Mut::new`], [`Mut::empty`])
- cold signal - no memory; observers only see what is submitted after they attach ([`Mut::cold`])

# Basic usage

```rust
use contactbook_signals::*;

let name = Mut::new("buffy".to_string());
let shout = name.read().map(|name| name.to_uppercase());
let _sub = shout.subscribe(|value: String| println!("{value}"));
// prints BUFFY

name.set("willow".to_string());
// prints WILLOW
assert_eq!(shout.peek(), Some("WILLOW".to_string()));
```

Time-based and async operators (`debounce`, `then`, `bracket`, [`Read::from_future`]) spawn onto the
tokio runtime that is current when they are built.
*/

pub mod broadcast;
mod error;
mod operator;
mod porcelain;
mod signal;
mod subscription;
pub mod task;

pub use error::SignalError;
pub use operator::merge;
pub use porcelain::*;
pub use signal::*;
pub use task::TaskGuard;
