mod common;

use common::{open, FakeBus};
use rt2800::channel::RfWords;
use rt2800::regs::mac::{RF_BYPASS0, RF_CONTROL0};
use rt2800::{BusKind, ChannelDescriptor, RfType};

/// RF7620 synthesizer words for channel 6 (N, K spread over R17-R19)
const CH6_RF7620: RfWords = RfWords::new(0x40, 0x99, 0x99, 0x09);

/// Loopback tone seen on BBP55: the stopband drops by 2 for every RFCSR24 step above 0x07
fn rx_loopback_tone(bus: &FakeBus, word: u8) -> Option<u8> {
    if word != 55 {
        return None;
    }
    if bus.bbp[24] == 0 {
        return Some(0x40);
    }
    let steps = (bus.rfcsr[24] & 0x1f).saturating_sub(0x07);
    Some(0x40u8.saturating_sub(2 * steps))
}

/// LPF tone level on DCOC 0x39: full with the filter bypassed,
/// otherwise lowered by the filter code of the AGC register in use
fn lpf_tone(bus: &FakeBus, word: u8) -> Option<u8> {
    if word != 159 || bus.bbp[158] != 0x39 {
        return None;
    }
    if bus.dcoc[2] & 0x06 == 0 {
        return Some(0x3f);
    }
    let agc = if bus.reg(RF_CONTROL0) == 0x04 { 58 } else { 6 };
    Some(0x3f - (bus.rfcsr_bank(5, agc) & 0x7f).min(0x3f))
}

/// MT7620 SoC: reports an RT5390 with the RF7620 in the chip id word
fn rt6352() -> FakeBus {
    let mut bus = FakeBus::new(BusKind::Soc, 0x5390, 0x0500)
        .with_eeprom_word(0, 0x7620)
        .with_bbp_model(lpf_tone);
    bus.bbp[23] = 0x5a;
    bus.dcoc[2] = 0x01;
    bus.regs.insert(RF_CONTROL0, 0x11);
    bus.regs.insert(RF_BYPASS0, 0x22);
    bus
}

#[test]
fn rx_filter_backs_off_when_overtuned() {
    let bus = FakeBus::new(BusKind::Usb, 0x3070, 0x0201).with_bbp_model(rx_loopback_tone);
    let mut dev = open(bus);
    dev.init_rfcsr().expect("init_rfcsr");

    // 20MHz target 0x16 is hit exactly at 0x12 then passed: keep 0x12
    assert_eq!(dev.calibration().calibration_bw20, 0x12);
    // 40MHz target 0x19 is jumped over: keep the first value past it
    assert_eq!(dev.calibration().calibration_bw40, 0x34);
    assert_eq!(dev.calibration().rx_filter(true), 0x34);
    assert_eq!(dev.bus_mut().bbp[24], 0);
}

#[test]
fn rt6352_lpf_calibration() {
    let mut dev = open(rt6352());
    assert_eq!(dev.rf(), RfType::Rf7620);
    dev.init_rfcsr().expect("init_rfcsr");

    let calib = dev.calibration();
    assert_eq!(calib.tx_calibration_bw20, 0x0a);
    assert_eq!(calib.tx_calibration_bw40, 0x03);
    assert_eq!(calib.rx_calibration_bw20, 0x28);
    assert_eq!(calib.rx_calibration_bw40, 0x32);
}

#[test]
fn rt6352_lpf_restores_registers() {
    let mut dev = open(rt6352());
    dev.init_rfcsr().expect("init_rfcsr");

    let bus = dev.bus_mut();
    // DC calibration bank back to its table values
    for (reg, value) in [
        (0, 0x47), (1, 0x00), (3, 0x08), (4, 0x04), (5, 0x00), (6, 0x10), (7, 0x10),
        (8, 0x04), (17, 0x7c), (18, 0x00), (58, 0x10), (59, 0x0a),
    ] {
        assert_eq!(bus.rfcsr_bank(5, reg), value, "bank 5 reg {reg}");
    }
    assert_eq!(bus.reg(RF_CONTROL0), 0x11);
    assert_eq!(bus.reg(RF_BYPASS0), 0x22);
    assert_eq!(bus.bbp[23], 0x5a);
    assert_eq!(bus.dcoc[2], 0x01);
}

#[test]
fn rf7620_channel_switch_recalibrates_vco() {
    let mut dev = open(rt6352());
    dev.init_rfcsr().expect("init_rfcsr");
    dev.bus_mut().clear_logs();

    dev.config(&ChannelDescriptor::new(6, CH6_RF7620)).expect("config");

    let bus = dev.bus_mut();
    assert_eq!(bus.rfcsr_writes_to(5).last(), Some(&0x40));
    assert!(bus.rfcsr_writes_to(4).iter().any(|v| v & 0x80 != 0));
    assert_eq!(bus.rfcsr_writes_to(4).last(), Some(&0x8c));
    // Filter codes from the LPF calibration on both chains
    for bank in [5, 7] {
        assert_eq!(bus.rfcsr_bank(bank, 6) & 0x3f, 0x28);
        assert_eq!(bus.rfcsr_bank(bank, 58) & 0x3f, 0x0a);
    }
}
