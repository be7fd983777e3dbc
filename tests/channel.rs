mod common;

use common::{open, test_config, CountingDelay, FakeBus};
use rt2800::channel::{ChannelSpec, RfWords};
use rt2800::{Band, BusKind, ChannelDescriptor, Rt2800};

const NIC_CONF0: usize = 0x1a;
/// LNA word in the default map
const LNA: usize = 0x22;

const CH6_RF2820: RfWords = RfWords::new(0x0010_0bb3, 0x0013_01e1, 0x0005_a014, 0x0000_1402);

#[test]
fn rf2820_uses_legacy_rf_words() {
    let mut dev = open(FakeBus::new(BusKind::Pci, 0x2860, 0x0103));
    dev.bus_mut().clear_logs();

    dev.config_channel(&ChannelDescriptor::new(6, CH6_RF2820)).expect("config_channel");

    let bus = dev.bus_mut();
    assert!(bus.rfcsr_writes.is_empty());
    // Three passes of four words
    assert_eq!(bus.rf_words.len(), 12);
    assert_eq!(bus.rf_words[0], CH6_RF2820.rf1);
    let latch: Vec<bool> = bus.rf_words.iter().skip(2).step_by(4).map(|w| w & 0x4 != 0).collect();
    assert_eq!(latch, vec![false, true, false]);
}

#[test]
fn rf3020_programs_rfcsr() {
    let bus = FakeBus::new(BusKind::Usb, 0x3070, 0x0201).with_eeprom_word(NIC_CONF0, 0x0511);
    let mut dev = open(bus);
    dev.bus_mut().clear_logs();

    let dividers = ChannelSpec { n: 241, k: 2, r: 2 };
    dev.config_channel(&ChannelDescriptor::new(6, dividers)).expect("config_channel");

    let bus = dev.bus_mut();
    assert!(bus.rf_words.is_empty());
    assert_eq!(bus.rfcsr_writes.first(), Some(&(2, 241)));
}

#[test]
fn channel_switch_tracks_band() {
    let mut dev = open(FakeBus::new(BusKind::Pci, 0x2860, 0x0103));
    dev.config_channel(&ChannelDescriptor::new(36, CH6_RF2820)).expect("config_channel");
    assert_eq!(dev.channel().channel, 36);
    assert_eq!(dev.channel().band, Band::A);
}

#[test]
fn config_applies_default_gain() {
    // LNA gain 4 on 2.4GHz
    let bus = FakeBus::new(BusKind::Usb, 0x3070, 0x0201)
        .with_eeprom_word(NIC_CONF0, 0x0511)
        .with_eeprom_word(LNA, 0x0004);
    let mut dev = open(bus);
    dev.bus_mut().clear_logs();

    dev.config(&ChannelDescriptor::new(1, ChannelSpec { n: 241, k: 2, r: 2 })).expect("config");

    // RT3070 on 2.4GHz: 0x1c + 2 * lna
    assert_eq!(dev.bus_mut().bbp_writes_to(66).last(), Some(&0x24));
    assert_eq!(dev.link_qual().vgc_level, 0x24);
}

#[test]
fn lna_gain_per_range() {
    let bus = FakeBus::new(BusKind::Usb, 0x3070, 0x0201).with_eeprom_word(LNA, 0x0a04);
    let mut dev = Rt2800::open(bus, CountingDelay::default(), test_config()).ok().expect("open");
    assert_eq!(dev.config_lna_gain(11), 0x04);
    assert_eq!(dev.config_lna_gain(36), 0x0a);
}
