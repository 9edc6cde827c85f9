//! Branch decisions for the iteration state machine.

/// Hard ceiling on critic passes per item, regardless of configuration.
pub const CRITIC_PASS_CEILING: u32 = 2;

/// The refinement cap actually in effect: the lesser of the configured
/// maximum and the fixed ceiling.
pub fn effective_critic_cap(configured_max: u32) -> u32 {
    configured_max.min(CRITIC_PASS_CEILING)
}

/// True while another critic pass should run for the current item.
pub fn should_refine(critic_iteration: u32, configured_max: u32) -> bool {
    critic_iteration < effective_critic_cap(configured_max)
}

/// Number of items a run works through: the redesigned scale's length, or
/// the configured ceiling when the scale is empty.
pub fn total_items(scale_len: usize, max_player_iterations: usize) -> usize {
    if scale_len == 0 {
        max_player_iterations
    } else {
        scale_len
    }
}

/// True while another item should be played.
pub fn should_continue(item_index: usize, scale_len: usize, max_player_iterations: usize) -> bool {
    item_index < total_items(scale_len, max_player_iterations)
        && item_index < max_player_iterations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critic_cap_is_the_lesser_of_config_and_ceiling() {
        assert_eq!(effective_critic_cap(0), 0);
        assert_eq!(effective_critic_cap(1), 1);
        assert_eq!(effective_critic_cap(3), 2);
        assert_eq!(effective_critic_cap(u32::MAX), 2);
    }

    #[test]
    fn should_refine_stops_at_the_effective_cap() {
        assert!(should_refine(0, 3));
        assert!(should_refine(1, 3));
        assert!(!should_refine(2, 3));
        assert!(!should_refine(0, 0));
    }

    #[test]
    fn empty_scale_falls_back_to_the_iteration_ceiling() {
        assert_eq!(total_items(0, 10), 10);
        assert_eq!(total_items(4, 10), 4);
    }

    #[test]
    fn should_continue_respects_both_bounds() {
        assert!(should_continue(0, 3, 10));
        assert!(should_continue(2, 3, 10));
        assert!(!should_continue(3, 3, 10));
        // The iteration ceiling wins over a long scale.
        assert!(should_continue(9, 25, 10));
        assert!(!should_continue(10, 25, 10));
    }
}
