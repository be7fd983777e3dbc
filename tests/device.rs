mod common;

use common::{open, test_config, CountingDelay, FakeBus};
use rt2800::chip::probe_rt;
use rt2800::indirect::RegisterBank;
use rt2800::regs::mac::BBP_CSR_CFG;
use rt2800::{BusKind, ChipFamily, RfType, Rt2800, Rt2800Error};

/// NIC_CONF0 word index in the default map
const NIC_CONF0: usize = 0x1a;

#[test]
fn probe_reports_family_and_revision() {
    let mut bus = FakeBus::new(BusKind::Usb, 0x3070, 0x0201);
    let id = probe_rt(&mut bus).expect("probe");
    assert_eq!(id.family, ChipFamily::Rt3070);
    assert_eq!(id.revision, 0x0201);
    assert_eq!(id.bus, BusKind::Usb);
    assert_eq!(id.rf, None);
}

#[test]
fn probe_soc_rt5390_is_rt6352() {
    let mut bus = FakeBus::new(BusKind::Soc, 0x5390, 0x0500);
    let id = probe_rt(&mut bus).expect("probe");
    assert_eq!(id.family, ChipFamily::Rt6352);
}

#[test]
fn unknown_chipset_rejected() {
    let bus = FakeBus::new(BusKind::Usb, 0x1234, 0x0001);
    let res = Rt2800::open(bus, CountingDelay::default(), test_config());
    assert_eq!(res.err(), Some(Rt2800Error::UnsupportedChipset(0x1234)));
}

#[test]
fn unsupported_rf_rejected() {
    // RF2853 is known but never programmed
    let bus = FakeBus::new(BusKind::Pci, 0x2860, 0x0103).with_eeprom_word(NIC_CONF0, 0x0a12);
    let res = Rt2800::open(bus, CountingDelay::default(), test_config());
    assert_eq!(res.err(), Some(Rt2800Error::UnsupportedRfType(0x000a)));
}

#[test]
fn blank_eeprom_defaults() {
    let dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    assert_eq!(dev.chip().family, ChipFamily::Rt3070);
    assert_eq!(dev.rf(), RfType::Rf2820);
    // 1 TX, 2 RX
    assert_eq!(dev.chains(), (1, 2));
    assert_eq!(dev.eeprom().read(rt2800::eeprom::EepromField::NicConf1), 0);
}

#[test]
fn chains_from_eeprom() {
    let dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201).with_eeprom_word(NIC_CONF0, 0x0511));
    assert_eq!(dev.rf(), RfType::Rf3020);
    assert_eq!(dev.chains(), (1, 1));
}

#[test]
fn settings_kept_from_open() {
    let dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    assert_eq!(dev.settings().busy_count, 7);
    assert!(dev.settings().link_tuning);
}

#[test]
fn busy_bit_times_out_after_budget() {
    let mut dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    dev.bus_mut().bbp_stuck = true;
    dev.bus_mut().clear_logs();

    let res = dev.bbp_read(0);
    assert_eq!(res, Err(Rt2800Error::RegisterBusyTimeout { bank: RegisterBank::Bbp, offset: BBP_CSR_CFG }));

    let (bus, delay) = dev.release();
    assert_eq!(bus.bbp_csr_reads, test_config().busy_count as usize);
    // Nothing was issued on the stuck bank
    assert!(bus.writes.iter().all(|(offset, _)| *offset != BBP_CSR_CFG));
    assert_eq!(delay.total_us, 5 * test_config().busy_count as u64);
}

#[test]
fn indirect_banks_round_trip() {
    let mut dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    dev.bbp_write(66, 0x2e).expect("bbp write");
    assert_eq!(dev.bbp_read(66), Ok(0x2e));
    dev.rfcsr_write(7, 0x60).expect("rfcsr write");
    assert_eq!(dev.rfcsr_modify(7, |r| *r |= 0x01), Ok(0x61));
    assert_eq!(dev.bus_mut().rfcsr[7], 0x61);
}

#[test]
fn rx_chain_write_selects_each_chain() {
    let mut dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    dev.bus_mut().clear_logs();
    dev.bbp_write_with_rx_chain(66, 0x1c).expect("write");
    let bus = dev.bus_mut();
    assert_eq!(bus.bbp_writes_to(66), vec![0x1c, 0x1c]);
    assert_eq!(bus.bbp_writes_to(27).len(), 2);
}
