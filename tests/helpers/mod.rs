mod mock_nameserver;

pub use mock_nameserver::{Behaviour, MockNameserver};
