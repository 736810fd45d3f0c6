//! Per-device state table
//!
//! Maps a device identifier to the most recent [`DeviceState`] decoded
//! from that node. Records are replaced wholesale on every valid report
//! and never expire; the table grows to the set of devices heard from
//! over the process lifetime.

use std::collections::HashMap;

use twe_protocol::{DeviceState, CHANNELS};

/// Latest-state table, keyed by device identifier
#[derive(Debug, Default)]
pub struct DeviceTable {
    states: HashMap<u8, DeviceState>,
}

impl DeviceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record for the state's device id
    pub fn apply(&mut self, state: DeviceState) {
        self.states.insert(state.device_id, state);
    }

    /// Snapshot copy of a device's record
    pub fn get(&self, device_id: u8) -> Option<DeviceState> {
        self.states.get(&device_id).copied()
    }

    /// One analog reading in millivolts; `None` for an unknown device
    /// or a channel outside 0..4
    pub fn analog(&self, device_id: u8, channel: usize) -> Option<i32> {
        if channel >= CHANNELS {
            return None;
        }
        self.states.get(&device_id).map(|s| s.analog_input[channel])
    }

    /// One digital input level; same absence rules as [`analog`](Self::analog)
    pub fn digital(&self, device_id: u8, channel: usize) -> Option<bool> {
        if channel >= CHANNELS {
            return None;
        }
        self.states.get(&device_id).map(|s| s.digital_input[channel])
    }

    /// Identifiers of every device heard from, ascending
    pub fn device_ids(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.states.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of devices observed so far
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True before the first valid report arrives
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_for(device_id: u8) -> DeviceState {
        DeviceState {
            device_id,
            analog_input: [100, 200, 300, 400],
            digital_input: [true, false, true, false],
            ..Default::default()
        }
    }

    #[test]
    fn unknown_device_queries_return_none() {
        let table = DeviceTable::new();
        assert_eq!(table.get(0x99), None);
        assert_eq!(table.analog(0x99, 0), None);
        assert_eq!(table.digital(0x99, 0), None);
    }

    #[test]
    fn apply_replaces_the_whole_record() {
        let mut table = DeviceTable::new();
        table.apply(state_for(0x01));

        let mut updated = state_for(0x01);
        updated.analog_input = [1, 2, 3, 4];
        updated.digital_input = [false; 4];
        table.apply(updated);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0x01), Some(updated));
    }

    #[test]
    fn channel_accessors_bounds_check() {
        let mut table = DeviceTable::new();
        table.apply(state_for(0x01));

        assert_eq!(table.analog(0x01, 3), Some(400));
        assert_eq!(table.analog(0x01, 4), None);
        assert_eq!(table.digital(0x01, 2), Some(true));
        assert_eq!(table.digital(0x01, usize::MAX), None);
    }

    #[test]
    fn device_ids_are_sorted() {
        let mut table = DeviceTable::new();
        table.apply(state_for(0x10));
        table.apply(state_for(0x02));
        table.apply(state_for(0x78));

        assert_eq!(table.device_ids(), vec![0x02, 0x10, 0x78]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn applied_state_is_readable_under_its_own_id(device_id: u8) {
                let mut table = DeviceTable::new();
                table.apply(state_for(device_id));
                prop_assert_eq!(table.get(device_id), Some(state_for(device_id)));
                prop_assert_eq!(table.analog(device_id, 0), Some(100));
            }

            #[test]
            fn out_of_range_channels_are_always_none(
                device_id: u8,
                channel in CHANNELS..usize::MAX
            ) {
                let mut table = DeviceTable::new();
                table.apply(state_for(device_id));
                prop_assert_eq!(table.analog(device_id, channel), None);
                prop_assert_eq!(table.digital(device_id, channel), None);
            }
        }
    }
}
