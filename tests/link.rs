mod common;

use common::{open, test_config, CountingDelay, FakeBus};
use rt2800::regs::mac::RX_STA_CNT0;
use rt2800::{BusKind, Rt2800};

#[test]
fn gain_follows_rssi() {
    let mut dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    dev.bus_mut().clear_logs();

    dev.link_tuner(-70).expect("tuner");
    assert_eq!(dev.bus_mut().bbp_writes_to(66), vec![0x2c]);

    // Same level, nothing written
    dev.link_tuner(-72).expect("tuner");
    assert_eq!(dev.bus_mut().bbp_writes_to(66).len(), 1);

    dev.link_tuner(-85).expect("tuner");
    assert_eq!(dev.bus_mut().bbp_writes_to(66), vec![0x2c, 0x1c]);
    assert_eq!(dev.link_qual().vgc_level, 0x1c);
    assert_eq!(dev.link_qual().rssi, -85);
}

#[test]
fn tuning_disabled() {
    let bus = FakeBus::new(BusKind::Usb, 0x3070, 0x0201);
    let mut dev = Rt2800::open(bus, CountingDelay::default(), test_config().with_link_tuning(false))
        .ok()
        .expect("open");
    dev.bus_mut().clear_logs();
    dev.link_tuner(-50).expect("tuner");
    assert!(dev.bus_mut().bbp_writes.is_empty());
}

#[test]
fn rt2860c_never_tuned() {
    let mut dev = open(FakeBus::new(BusKind::Pci, 0x2860, 0x0100));
    dev.bus_mut().clear_logs();
    dev.link_tuner(-50).expect("tuner");
    assert!(dev.bus_mut().bbp_writes.is_empty());
}

#[test]
fn reset_reapplies_default() {
    let mut dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    dev.link_tuner(-70).expect("tuner");
    dev.bus_mut().clear_logs();

    dev.reset_tuner().expect("reset");
    assert_eq!(dev.bus_mut().bbp_writes_to(66), vec![0x1c]);
    assert_eq!(dev.link_qual().rssi, 0);
}

#[test]
fn stats_from_counters() {
    let mut dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    // PHY errors in the high half, CRC errors in the low half
    dev.bus_mut().regs.insert(RX_STA_CNT0, 0x0003_0011);
    let stats = dev.link_stats().expect("stats");
    assert_eq!(stats.rx_failed, 0x11);
    assert_eq!(stats.rx_phy_errors, 3);
}
