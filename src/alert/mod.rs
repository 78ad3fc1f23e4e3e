/// Alert derivation: per-reading severity classification and descriptions.

pub mod severity;
