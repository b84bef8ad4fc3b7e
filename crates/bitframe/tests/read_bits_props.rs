use bitframe::{ReadError, bits::read_bits};
use proptest::prelude::*;

fn buffer_and_range() -> impl Strategy<Value = (Vec<u8>, usize, usize)> {
    prop::collection::vec(any::<u8>(), 1..16).prop_flat_map(|data| {
        let total_bits = data.len() * 8;
        (Just(data), 0..total_bits).prop_flat_map(move |(data, start)| {
            let max_end = (start + 63).min(total_bits - 1);
            (Just(data), Just(start), start..=max_end)
        })
    })
}

fn read_bit_by_bit(data: &[u8], start: usize, end: usize) -> u64 {
    (start..=end).fold(0, |acc, pos| {
        (acc << 1) | ((data[pos / 8] >> (7 - pos % 8)) & 1) as u64
    })
}

proptest! {
    #[test]
    fn value_fits_in_range_width((data, start, end) in buffer_and_range()) {
        let value = read_bits(&data, start, end).unwrap();
        let width = end - start + 1;
        if width < 64 {
            prop_assert!(value < (1u64 << width));
        }
    }

    #[test]
    fn matches_bit_by_bit_read((data, start, end) in buffer_and_range()) {
        prop_assert_eq!(read_bits(&data, start, end).unwrap(), read_bit_by_bit(&data, start, end));
    }

    #[test]
    fn first_byte_is_identity(data in prop::collection::vec(any::<u8>(), 1..8)) {
        prop_assert_eq!(read_bits(&data, 0, 7).unwrap(), data[0] as u64);
    }

    #[test]
    fn start_after_end_is_invalid(
        data in prop::collection::vec(any::<u8>(), 0..8),
        end in 0usize..128,
        gap in 1usize..64,
    ) {
        let start = end + gap;
        prop_assert_eq!(
            read_bits(&data, start, end).unwrap_err(),
            ReadError::InvalidRange { start, end }
        );
    }

    #[test]
    fn end_past_buffer_is_out_of_range(
        data in prop::collection::vec(any::<u8>(), 0..8),
        extra in 0usize..32,
    ) {
        let end = data.len() * 8 + extra;
        prop_assert_eq!(
            read_bits(&data, end, end).unwrap_err(),
            ReadError::OutOfRange { end, available_bits: data.len() * 8 }
        );
    }
}

#[test]
fn test_nibbles_across_bytes() {
    assert_eq!(read_bits(&[0xAB, 0xCD], 4, 11).unwrap(), 188);
}
