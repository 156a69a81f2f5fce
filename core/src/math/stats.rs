pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f32>() / samples.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_yields_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
    }

    #[test]
    fn mean_of_sensor_buffer() {
        assert_eq!(StatsHelper::mean(&[100.0, 102.0, 98.0, 101.0, 99.0]), 100.0);
    }

    #[test]
    fn mean_handles_single_value() {
        assert_eq!(StatsHelper::mean(&[4.0]), 4.0);
    }
}
