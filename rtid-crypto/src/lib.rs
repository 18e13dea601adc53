pub mod yespower;

pub use yespower::{pow_hash, yespower, YespowerParams};
