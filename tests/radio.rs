mod common;

use common::{open, FakeBus, McuCommand};
use rt2800::regs::bbp::{BBP1_TX_ANTENNA, BBP3_RX_ANTENNA};
use rt2800::regs::mac::*;
use rt2800::{BusKind, FilterFlags};

fn rt3070() -> FakeBus {
    FakeBus::new(BusKind::Usb, 0x3070, 0x0201)
}

#[test]
fn mac_init_rt3070() {
    let mut dev = open(rt3070());
    dev.init_registers().expect("init_registers");

    let bus = dev.bus_mut();
    assert_eq!(bus.reg(TX_SW_CFG0), 0x400);
    assert_eq!(bus.reg(TX_SW_CFG1), 0x0008_0606);
    assert_eq!(bus.reg(TX_SW_CFG2), 0);
    assert_eq!(bus.reg(mac_wcid_entry(0)), 0xffff_ffff);
    assert_eq!(bus.reg(mac_wcid_entry(0) + 4), 0xffff_ffff);
    assert_eq!(bus.reg(mac_wcid_attr_entry(12)), 0);
    assert_eq!(US_CYC_CNT_CLOCK_CYCLE.get(bus.reg(US_CYC_CNT)), 30);
    assert_eq!(bus.reg(HT_FBK_CFG0), 0x6543_2100);
    assert_eq!(bus.reg(HT_FBK_CFG1), 0xedcb_a988);

    // Monitor filter: bad FCS kept, PHY errors dropped
    let filter = bus.reg(RX_FILTER_CFG);
    assert!(!RX_FILTER_CFG_DROP_CRC_ERROR.is_set(filter));
    assert!(RX_FILTER_CFG_DROP_PHY_ERROR.is_set(filter));
    assert_eq!(bus.reg(MAC_SYS_CTRL), 0);
}

#[test]
fn beacon_slots_cleared() {
    let mut bus = rt3070();
    bus.regs.insert(hw_beacon_base(6) + 12, 0xdead_beef);
    bus.regs.insert(hw_beacon_base(7), 0x1234_5678);
    let mut dev = open(bus);
    dev.init_registers().expect("init_registers");

    let bus = dev.bus_mut();
    assert_eq!(hw_beacon_base(7), 0x5bc0);
    assert_eq!(bus.reg(hw_beacon_base(6) + 12), 0);
    assert_eq!(bus.reg(hw_beacon_base(7)), 0);
    for slot in 0..HW_BEACON_COUNT {
        let base = hw_beacon_base(slot);
        let cleared = bus.writes.iter()
            .filter(|(offset, value)| (base..base + TXWI_DESC_SIZE_4WORDS).contains(offset) && *value == 0)
            .count();
        assert_eq!(cleared, 4, "slot {slot}");
    }
}

#[test]
fn enable_then_disable() {
    let mut dev = open(rt3070());
    dev.bus_mut().clear_logs();
    dev.enable_radio().expect("enable_radio");

    let bus = dev.bus_mut();
    let commands: Vec<u8> = bus.mcu_commands.iter().map(|c| c.command).collect();
    assert_eq!(commands.first(), Some(&MCU_BOOT_SIGNAL));
    assert!(commands.contains(&MCU_CURRENT));

    // LED setup from the default EEPROM values
    let leds = &bus.mcu_commands[bus.mcu_commands.len() - 3..];
    assert_eq!(leds, &[
        McuCommand { command: MCU_LED_AG_CONF, token: TOKEN_NO_INTR, arg0: 0x55, arg1: 0x55 },
        McuCommand { command: MCU_LED_ACT_CONF, token: TOKEN_NO_INTR, arg0: 0x21, arg1: 0x22 },
        McuCommand { command: MCU_LED_LED_POLARITY, token: TOKEN_NO_INTR, arg0: 0xf8, arg1: 0xa9 },
    ]);

    let ctrl = bus.reg(MAC_SYS_CTRL);
    assert!(MAC_SYS_CTRL_ENABLE_TX.is_set(ctrl));
    assert!(MAC_SYS_CTRL_ENABLE_RX.is_set(ctrl));
    assert!(WPDMA_GLO_CFG_ENABLE_RX_DMA.is_set(bus.reg(WPDMA_GLO_CFG)));

    // A DMA engine stuck busy does not prevent shutting the MAC down
    bus.dma_stuck = true;
    dev.disable_radio().expect("disable_radio");
    let ctrl = dev.bus_mut().reg(MAC_SYS_CTRL);
    assert!(!MAC_SYS_CTRL_ENABLE_TX.is_set(ctrl));
    assert!(!MAC_SYS_CTRL_ENABLE_RX.is_set(ctrl));
}

#[test]
fn enable_aborts_on_stuck_dma() {
    let mut bus = rt3070();
    bus.dma_stuck = true;
    let mut dev = open(bus);
    dev.bus_mut().clear_logs();
    assert!(dev.enable_radio().is_err());
    assert!(dev.bus_mut().mcu_commands.is_empty());
}

#[test]
fn strict_filter_drops_errors() {
    let mut dev = open(rt3070());
    dev.config_filter(FilterFlags::NONE).expect("filter");
    let filter = dev.bus_mut().reg(RX_FILTER_CFG);
    assert!(RX_FILTER_CFG_DROP_CRC_ERROR.is_set(filter));
    assert!(RX_FILTER_CFG_DROP_PHY_ERROR.is_set(filter));
    assert!(RX_FILTER_CFG_DROP_MULTICAST.is_set(filter));
}

#[test]
fn rfkill_from_gpio() {
    let mut dev = open(rt3070());
    assert_eq!(dev.rfkill_poll(), Ok(false));
    dev.bus_mut().regs.insert(GPIO_CTRL, GPIO_CTRL_VAL2.mask());
    assert_eq!(dev.rfkill_poll(), Ok(true));
}

#[test]
fn antennas_follow_chains() {
    // Blank EEPROM: 1 TX, 2 RX
    let mut dev = open(rt3070());
    dev.bus_mut().bbp[1] = 0xff;
    dev.config_ant().expect("config_ant");
    let bus = dev.bus_mut();
    assert_eq!(BBP3_RX_ANTENNA.get(bus.bbp[3]), 1);
    assert_eq!(BBP1_TX_ANTENNA.get(bus.bbp[1]), 0);
    // Other bits untouched
    assert_eq!(bus.bbp[1], 0xe7);
}
