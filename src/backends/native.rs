// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::io::SampleTrace;

/// In-process complement model: `Z[i] = 1 - A[i]` with no latency.
pub fn invert(input: &SampleTrace) -> SampleTrace {
    SampleTrace::new(input.aligned().iter().map(|a| 1 - a).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complements_every_sample() {
        let z = invert(&SampleTrace::new(vec![0, 1, 1, 0, 1]));
        assert_eq!(z.values(), &[1, 0, 0, 1, 0]);
        assert_eq!(z.latency(), 0);
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(invert(&SampleTrace::new(vec![])).is_empty());
    }
}
