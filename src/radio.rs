//! # Radio bring-up
//!
//! MAC register initialization and the radio on/off sequences.
//!
//! [`enable_radio`](Rt2800::enable_radio) must run after the firmware was loaded. It programs the MAC
//! (protocol timings, protection, fallback tables, station table clearing), boots the MCU, waits for the
//! baseband, runs the static BBP and RF calibration tables and finally enables RX.
//! Any polling timeout aborts the sequence: call [`disable_radio`](Rt2800::disable_radio) before retrying.
//!
//! ## Available Methods
//! - [`init_registers`](Rt2800::init_registers) - Program the MAC registers
//! - [`enable_radio`](Rt2800::enable_radio) - Full radio bring-up
//! - [`disable_radio`](Rt2800::disable_radio) - Stop DMA and the MAC TX/RX paths
//! - [`config_filter`](Rt2800::config_filter) - Select which frames reach the host
//! - [`config_ant`](Rt2800::config_ant) - Configure the TX/RX antennas from the chain counts
//! - [`rfkill_poll`](Rt2800::rfkill_poll) - Read the hardware radio switch

use core::ops::BitOr;

use embedded_hal::blocking::delay::DelayUs;

use crate::channel::{Antenna, Band};
use crate::chip::*;
use crate::eeprom::{EepromField, FREQ_LED_MODE, NIC_CONF1_ANT_DIVERSITY, NIC_CONF1_DAC_TEST};
use crate::regs::bbp::*;
use crate::regs::mac::*;
use crate::{Field32, RegisterBus, Rt2800, Rt2800Error};

/// Largest MPDU accepted by the MAC
const AGGREGATION_SIZE: u32 = 3840;
/// RTS threshold disabling RTS/CTS
const MAX_RTS_THRESHOLD: u32 = 2353;

/// Frame classes forwarded to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterFlags(u16);

impl FilterFlags {
    pub const NONE: FilterFlags = FilterFlags(0);
    /// All multicast frames
    pub const ALLMULTI: FilterFlags = FilterFlags(1 << 1);
    /// Frames with a bad FCS
    pub const FCSFAIL: FilterFlags = FilterFlags(1 << 2);
    /// Frames with a PLCP CRC error
    pub const PLCPFAIL: FilterFlags = FilterFlags(1 << 3);
    /// Control frames (ACK, CTS, RTS, BAR, CF-End)
    pub const CONTROL: FilterFlags = FilterFlags(1 << 5);
    /// Frames from other BSS
    pub const OTHER_BSS: FilterFlags = FilterFlags(1 << 6);
    /// PS-Poll frames
    pub const PSPOLL: FilterFlags = FilterFlags(1 << 7);

    /// Filter used for passive capture: everything except PHY errors
    pub const MONITOR: FilterFlags = FilterFlags(
        Self::ALLMULTI.0 | Self::FCSFAIL.0 | Self::CONTROL.0 | Self::PSPOLL.0 | Self::OTHER_BSS.0
    );

    pub fn contains(&self, other: FilterFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl BitOr for FilterFlags {
    type Output = FilterFlags;
    fn bitor(self, rhs: Self) -> Self::Output {
        FilterFlags(self.0 | rhs.0)
    }
}

/// RX filter register value for a set of flags.
/// Frames not addressed to us are always kept, version errors always dropped.
pub fn rx_filter_value(reg: u32, flags: FilterFlags) -> u32 {
    let drop_ctrl = !flags.contains(FilterFlags::CONTROL);
    let mut reg = reg;
    RX_FILTER_CFG_DROP_CRC_ERROR.set_bool(&mut reg, !flags.contains(FilterFlags::FCSFAIL));
    RX_FILTER_CFG_DROP_PHY_ERROR.set_bool(&mut reg, !flags.contains(FilterFlags::PLCPFAIL));
    RX_FILTER_CFG_DROP_NOT_TO_ME.set(&mut reg, 0);
    RX_FILTER_CFG_DROP_NOT_MY_BSSD.set(&mut reg, 0);
    RX_FILTER_CFG_DROP_VER_ERROR.set(&mut reg, 1);
    RX_FILTER_CFG_DROP_MULTICAST.set_bool(&mut reg, !flags.contains(FilterFlags::ALLMULTI));
    RX_FILTER_CFG_DROP_BROADCAST.set(&mut reg, 0);
    RX_FILTER_CFG_DROP_DUPLICATE.set(&mut reg, 0);
    for field in [RX_FILTER_CFG_DROP_CF_END_ACK, RX_FILTER_CFG_DROP_CF_END, RX_FILTER_CFG_DROP_ACK,
                  RX_FILTER_CFG_DROP_CTS, RX_FILTER_CFG_DROP_RTS, RX_FILTER_CFG_DROP_BAR, RX_FILTER_CFG_DROP_CNTL] {
        field.set_bool(&mut reg, drop_ctrl);
    }
    RX_FILTER_CFG_DROP_PSPOLL.set_bool(&mut reg, !flags.contains(FilterFlags::PSPOLL));
    RX_FILTER_CFG_DROP_BA.set(&mut reg, 0);
    reg
}

/// Protection configuration of one frame class
struct ProtCfg {
    reg: u32,
    rate: u32,
    ctrl: u32,
    allow_cck: bool,
    allow_40: bool,
    rts: bool,
}

const PROT_CFGS: [ProtCfg; 6] = [
    ProtCfg { reg: CCK_PROT_CFG,  rate: 3,      ctrl: 0, allow_cck: true,  allow_40: false, rts: true },
    ProtCfg { reg: OFDM_PROT_CFG, rate: 3,      ctrl: 0, allow_cck: true,  allow_40: false, rts: true },
    ProtCfg { reg: MM20_PROT_CFG, rate: 0x4004, ctrl: 1, allow_cck: false, allow_40: false, rts: false },
    ProtCfg { reg: MM40_PROT_CFG, rate: 0x4084, ctrl: 1, allow_cck: false, allow_40: true,  rts: false },
    ProtCfg { reg: GF20_PROT_CFG, rate: 0x4004, ctrl: 1, allow_cck: false, allow_40: false, rts: false },
    ProtCfg { reg: GF40_PROT_CFG, rate: 0x4084, ctrl: 1, allow_cck: false, allow_40: true,  rts: false },
];

impl ProtCfg {
    fn apply(&self, reg: &mut u32) {
        PROT_CFG_PROTECT_RATE.set(reg, self.rate);
        PROT_CFG_PROTECT_CTRL.set(reg, self.ctrl);
        PROT_CFG_PROTECT_NAV_SHORT.set(reg, 1);
        PROT_CFG_TX_OP_ALLOW_CCK.set_bool(reg, self.allow_cck);
        PROT_CFG_TX_OP_ALLOW_OFDM.set(reg, 1);
        PROT_CFG_TX_OP_ALLOW_MM20.set(reg, 1);
        PROT_CFG_TX_OP_ALLOW_MM40.set_bool(reg, self.allow_40);
        PROT_CFG_TX_OP_ALLOW_GF20.set(reg, 1);
        PROT_CFG_TX_OP_ALLOW_GF40.set_bool(reg, self.allow_40);
        PROT_CFG_RTS_TH_EN.set_bool(reg, self.rts);
    }
}

/// Pack a rate fallback chain, one nibble per rate
pub(crate) fn fallback_chain(rates: &[u8]) -> u32 {
    rates.iter().enumerate()
        .fold(0, |acc, (i, r)| acc | ((*r as u32 & 0xf) << (4 * i)))
}

/// TX_SW_CFG0..2 values. `None` leaves the register untouched
type TxSwCfg = (u32, Option<u32>, Option<u32>);

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    fn tx_sw_cfg(&self) -> TxSwCfg {
        let chip = &self.chip;
        let dac_test = NIC_CONF1_DAC_TEST.is_set(self.eeprom.read(EepromField::NicConf1));
        match chip.family {
            ChipFamily::Rt3071 | ChipFamily::Rt3090 | ChipFamily::Rt3290 | ChipFamily::Rt3390 => {
                let cfg0 = if chip.is(ChipFamily::Rt3290) { 0x404 } else { 0x400 };
                let early = chip.rev_lt(ChipFamily::Rt3071, REV_RT3071E)
                    || chip.rev_lt(ChipFamily::Rt3090, REV_RT3090E)
                    || chip.rev_lt(ChipFamily::Rt3390, REV_RT3390E);
                let cfg2 = match (early, dac_test) {
                    (true, true) => 0x2c,
                    (true, false) => 0x0f,
                    (false, _) => 0,
                };
                (cfg0, Some(0), Some(cfg2))
            }
            ChipFamily::Rt3070 if chip.rev_lt(ChipFamily::Rt3070, REV_RT3070F) => (0x400, Some(0), Some(0x2c)),
            ChipFamily::Rt3070 => (0x400, Some(0x0008_0606), Some(0)),
            _ if chip.is_305x_soc() => (0x400, Some(0), Some(0x30)),
            ChipFamily::Rt3352 => (0x402, Some(0x0008_0606), Some(0)),
            ChipFamily::Rt3572 => (0x400, Some(0x0008_0606), None),
            ChipFamily::Rt3593 => {
                let cfg2 = match (chip.rev_lt(ChipFamily::Rt3593, REV_RT3593E), dac_test) {
                    (true, true) => 0x1f,
                    (true, false) => 0x0f,
                    (false, _) => 0,
                };
                (0x402, Some(0), Some(cfg2))
            }
            ChipFamily::Rt3883 => (0x402, Some(0), Some(0x0004_0000)),
            ChipFamily::Rt5390 | ChipFamily::Rt5392 | ChipFamily::Rt6352 => (0x404, Some(0x0008_0606), Some(0)),
            ChipFamily::Rt5592 => (0x404, Some(0), Some(0)),
            ChipFamily::Rt5350 => (0x404, None, None),
            _ => (0, Some(0x0008_0606), None),
        }
    }

    fn max_psdu(&self) -> u32 {
        let chip = &self.chip;
        if chip.bus.is_usb() {
            3
        } else if chip.rev_gte(ChipFamily::Rt2872, REV_RT2872E)
            || chip.is(ChipFamily::Rt2883)
            || chip.rev_lt(ChipFamily::Rt3070, REV_RT3070E) {
            2
        } else {
            1
        }
    }

    fn init_rt3290_power(&mut self) -> Result<(), Rt2800Error> {
        let reg = self.read_reg(WLAN_FUN_CTRL)?;
        if WLAN_EN.is_set(reg) {
            self.write_reg(WLAN_FUN_CTRL, PCIE_APP0_CLK_REQ.with(reg, 1))?;
        }
        let mut reg = self.read_reg(CMB_CTRL)?;
        if !LDO0_EN.is_set(reg) {
            LDO0_EN.set(&mut reg, 1);
            LDO_BGSEL.set(&mut reg, 3);
            self.write_reg(CMB_CTRL, reg)?;
        }
        self.modify_reg(OSC_CTRL, |reg| {
            OSC_ROSC_EN.set(reg, 1);
            OSC_CAL_REQ.set(reg, 1);
            OSC_REF_CYCLE.set(reg, 0x27);
        })?;
        self.write_field(COEX_CFG0, COEX_CFG_ANT, 0x5e)?;
        self.modify_reg(COEX_CFG2, |reg| {
            BT_COEX_CFG1.set(reg, 0x00);
            BT_COEX_CFG0.set(reg, 0x17);
            WL_COEX_CFG1.set(reg, 0x93);
            WL_COEX_CFG0.set(reg, 0x7f);
        })?;
        self.write_field(PLL_CTRL, PLL_CONTROL, 1)
    }

    /// Clear the station table, the IV/EIV table and the shared key modes
    fn clear_key_tables(&mut self) -> Result<(), Rt2800Error> {
        for i in 0..SHARED_KEY_MODE_COUNT {
            self.write_reg(shared_key_mode_entry(i), 0)?;
        }
        // Empty station entry: broadcast MAC and no BSSID
        let empty = [0xffu8; MAC_WCID_ENTRY_SIZE];
        for i in 0..WCID_COUNT {
            self.write_multi(mac_wcid_entry(i), &empty)?;
            self.write_reg(mac_wcid_attr_entry(i), 0)?;
            self.write_reg(mac_iveiv_entry(i), 0)?;
        }
        Ok(())
    }

    /// Zero the TX descriptor of every beacon slot
    fn clear_beacon_slots(&mut self) -> Result<(), Rt2800Error> {
        let txwi_size = if self.chip.is(ChipFamily::Rt5592) { TXWI_DESC_SIZE_5WORDS } else { TXWI_DESC_SIZE_4WORDS };
        for slot in 0..HW_BEACON_COUNT {
            let base = hw_beacon_base(slot);
            for offset in (0..txwi_size).step_by(4) {
                self.write_reg(base + offset, 0)?;
            }
        }
        Ok(())
    }

    /// Program the MAC: protocol timings, protection, TX fallback tables, LED blink
    /// and channel statistics. Statistic counters, key tables and beacon slots are cleared.
    pub fn init_registers(&mut self) -> Result<(), Rt2800Error> {
        self.disable_wpdma()?;
        self.bus.init_registers().map_err(|_| Rt2800Error::Bus)?;

        self.write_reg(LEGACY_BASIC_RATE, 0x0000_013f)?;
        self.write_reg(HT_BASIC_RATE, 0x0000_8003)?;
        self.write_reg(MAC_SYS_CTRL, 0)?;

        self.modify_reg(BCN_TIME_CFG, |reg| {
            BCN_TIME_CFG_BEACON_INTERVAL.set(reg, 1600);
            BCN_TIME_CFG_TSF_TICKING.set(reg, 0);
            BCN_TIME_CFG_TSF_SYNC.set(reg, 0);
            BCN_TIME_CFG_TBTT_ENABLE.set(reg, 0);
            BCN_TIME_CFG_BEACON_GEN.set(reg, 0);
            BCN_TIME_CFG_TX_TIME_COMPENSATE.set(reg, 0);
        })?;

        self.config_filter(FilterFlags::MONITOR)?;

        self.modify_reg(BKOFF_SLOT_CFG, |reg| {
            BKOFF_SLOT_CFG_SLOT_TIME.set(reg, 9);
            BKOFF_SLOT_CFG_CC_DELAY_TIME.set(reg, 2);
        })?;

        if self.chip.is(ChipFamily::Rt3290) {
            self.init_rt3290_power()?;
        }

        let (cfg0, cfg1, cfg2) = self.tx_sw_cfg();
        self.write_reg(TX_SW_CFG0, cfg0)?;
        if let Some(cfg1) = cfg1 {
            self.write_reg(TX_SW_CFG1, cfg1)?;
        }
        if let Some(cfg2) = cfg2 {
            self.write_reg(TX_SW_CFG2, cfg2)?;
        }
        if self.chip.is(ChipFamily::Rt3883) {
            self.write_reg(TX_TXBF_CFG_0, 0x8000_fc21)?;
            self.write_reg(TX_TXBF_CFG_3, 0x0000_9c40)?;
        }

        self.modify_reg(TX_LINK_CFG, |reg| {
            TX_LINK_CFG_REMOTE_MFB_LIFETIME.set(reg, 32);
            TX_LINK_CFG_MFB_ENABLE.set(reg, 0);
            TX_LINK_CFG_REMOTE_UMFS_ENABLE.set(reg, 0);
            TX_LINK_CFG_TX_MRQ_EN.set(reg, 0);
            TX_LINK_CFG_TX_RDG_EN.set(reg, 0);
            TX_LINK_CFG_TX_CF_ACK_EN.set(reg, 1);
            TX_LINK_CFG_REMOTE_MFB.set(reg, 0);
            TX_LINK_CFG_REMOTE_MFS.set(reg, 0);
        })?;

        self.modify_reg(TX_TIMEOUT_CFG, |reg| {
            TX_TIMEOUT_CFG_MPDU_LIFETIME.set(reg, 9);
            TX_TIMEOUT_CFG_RX_ACK_TIMEOUT.set(reg, 32);
            TX_TIMEOUT_CFG_TX_OP_TIMEOUT.set(reg, 10);
        })?;

        let max_psdu = self.max_psdu();
        self.modify_reg(MAX_LEN_CFG, |reg| {
            MAX_LEN_CFG_MAX_MPDU.set(reg, AGGREGATION_SIZE);
            MAX_LEN_CFG_MAX_PSDU.set(reg, max_psdu);
            MAX_LEN_CFG_MIN_PSDU.set(reg, 10);
            MAX_LEN_CFG_MIN_MPDU.set(reg, 10);
        })?;

        self.modify_reg(LED_CFG, |reg| {
            LED_CFG_ON_PERIOD.set(reg, 70);
            LED_CFG_OFF_PERIOD.set(reg, 30);
            LED_CFG_SLOW_BLINK_PERIOD.set(reg, 3);
            LED_CFG_R_LED_MODE.set(reg, 3);
            LED_CFG_G_LED_MODE.set(reg, 3);
            LED_CFG_Y_LED_MODE.set(reg, 3);
            LED_CFG_LED_POLAR.set(reg, 1);
        })?;

        self.write_reg(PBF_MAX_PCNT, 0x1f3f_bf9f)?;

        self.modify_reg(TX_RTY_CFG, |reg| {
            TX_RTY_CFG_SHORT_RTY_LIMIT.set(reg, 2);
            TX_RTY_CFG_LONG_RTY_LIMIT.set(reg, 2);
            TX_RTY_CFG_LONG_RTY_THRE.set(reg, 2000);
            TX_RTY_CFG_NON_AGG_RTY_MODE.set(reg, 0);
            TX_RTY_CFG_AGG_RTY_MODE.set(reg, 0);
            TX_RTY_CFG_TX_AUTO_FB_ENABLE.set(reg, 1);
        })?;

        self.modify_reg(AUTO_RSP_CFG, |reg| {
            AUTO_RSP_CFG_AUTORESPONDER.set(reg, 1);
            AUTO_RSP_CFG_BAC_ACK_POLICY.set(reg, 1);
            AUTO_RSP_CFG_CTS_40_MMODE.set(reg, 1);
            AUTO_RSP_CFG_CTS_40_MREF.set(reg, 0);
            AUTO_RSP_CFG_AR_PREAMBLE.set(reg, 0);
            AUTO_RSP_CFG_DUAL_CTS_EN.set(reg, 0);
            AUTO_RSP_CFG_ACK_CTS_PSM_BIT.set(reg, 0);
        })?;

        for prot in &PROT_CFGS {
            self.modify_reg(prot.reg, |reg| prot.apply(reg))?;
        }

        if self.chip.bus.is_usb() {
            self.write_reg(PBF_CFG, 0x00f4_0006)?;
            self.modify_reg(WPDMA_GLO_CFG, |reg| {
                WPDMA_GLO_CFG_ENABLE_TX_DMA.set(reg, 0);
                WPDMA_GLO_CFG_TX_DMA_BUSY.set(reg, 0);
                WPDMA_GLO_CFG_ENABLE_RX_DMA.set(reg, 0);
                WPDMA_GLO_CFG_RX_DMA_BUSY.set(reg, 0);
                WPDMA_GLO_CFG_WP_DMA_BURST_SIZE.set(reg, 3);
                WPDMA_GLO_CFG_TX_WRITEBACK_DONE.set(reg, 0);
                WPDMA_GLO_CFG_BIG_ENDIAN.set(reg, 0);
                WPDMA_GLO_CFG_RX_HDR_SCATTER.set(reg, 0);
                WPDMA_GLO_CFG_HDR_SEG_LEN.set(reg, 0);
            })?;
        }

        // The reserved truncation bit is set as well
        self.modify_reg(TXOP_CTRL_CFG, |reg| {
            TXOP_CTRL_CFG_TIMEOUT_TRUN_EN.set(reg, 1);
            TXOP_CTRL_CFG_AC_TRUN_EN.set(reg, 1);
            TXOP_CTRL_CFG_TXRATEGRP_TRUN_EN.set(reg, 1);
            TXOP_CTRL_CFG_USER_MODE_TRUN_EN.set(reg, 1);
            TXOP_CTRL_CFG_MIMO_PS_TRUN_EN.set(reg, 1);
            TXOP_CTRL_CFG_RESERVED_TRUN_EN.set(reg, 1);
            TXOP_CTRL_CFG_LSIG_TXOP_EN.set(reg, 0);
            TXOP_CTRL_CFG_EXT_CCA_EN.set(reg, 0);
            TXOP_CTRL_CFG_EXT_CCA_DLY.set(reg, 88);
            TXOP_CTRL_CFG_EXT_CWMIN.set(reg, 0);
        })?;

        let hldr = if self.chip.is(ChipFamily::Rt5592) { 0x82 } else { 0x02 };
        self.write_reg(TXOP_HLDR_ET, hldr)?;

        if self.chip.is(ChipFamily::Rt3883) {
            self.write_reg(TX_FBK_CFG_3S_0, 0x1211_1008)?;
            self.write_reg(TX_FBK_CFG_3S_1, 0x1615_1413)?;
        }

        self.modify_reg(TX_RTS_CFG, |reg| {
            TX_RTS_CFG_AUTO_RTS_RETRY_LIMIT.set(reg, 7);
            TX_RTS_CFG_RTS_THRES.set(reg, MAX_RTS_THRESHOLD);
            TX_RTS_CFG_RTS_FBK_EN.set(reg, 1);
        })?;

        self.write_reg(EXP_ACK_TIME, 0x0024_00ca)?;

        // 16us SIFS for both CCK and OFDM
        self.modify_reg(XIFS_TIME_CFG, |reg| {
            XIFS_TIME_CFG_CCKM_SIFS_TIME.set(reg, 16);
            XIFS_TIME_CFG_OFDM_SIFS_TIME.set(reg, 16);
            XIFS_TIME_CFG_OFDM_XIFS_TIME.set(reg, 4);
            XIFS_TIME_CFG_EIFS.set(reg, 314);
            XIFS_TIME_CFG_BB_RXEND_ENABLE.set(reg, 1);
        })?;

        self.write_reg(PWR_PIN_CFG, 0x0000_0003)?;

        // The ASIC keeps garbage in the key tables after boot
        self.clear_key_tables()?;
        self.clear_beacon_slots()?;

        let clock_cycle = match self.chip.bus {
            BusKind::Usb => Some(30),
            BusKind::Pcie => Some(125),
            _ => None,
        };
        if let Some(cycle) = clock_cycle {
            self.write_field(US_CYC_CNT, US_CYC_CNT_CLOCK_CYCLE, cycle)?;
        }

        self.write_reg(HT_FBK_CFG0, fallback_chain(&[0, 0, 1, 2, 3, 4, 5, 6]))?;
        self.write_reg(HT_FBK_CFG1, fallback_chain(&[8, 8, 9, 10, 11, 12, 13, 14]))?;
        self.write_reg(LG_FBK_CFG0, fallback_chain(&[8, 8, 9, 10, 11, 12, 13, 14]))?;
        self.write_field(LG_FBK_CFG1, Field32::new(0x0000_ffff), fallback_chain(&[0, 0, 1, 2]))?;

        // BA window size comes from the TXWI
        self.modify_reg(AMPDU_BA_WINSIZE, |reg| {
            AMPDU_BA_WINSIZE_FORCE_WINSIZE_ENABLE.set(reg, 0);
            AMPDU_BA_WINSIZE_FORCE_WINSIZE.set(reg, 0);
        })?;

        // Clear on read
        for cnt in [RX_STA_CNT0, RX_STA_CNT1, RX_STA_CNT2, TX_STA_CNT0, TX_STA_CNT1, TX_STA_CNT2] {
            self.read_reg(cnt)?;
        }

        // Pre-TBTT interrupt 6ms ahead
        self.write_field(INT_TIMER_CFG, INT_TIMER_CFG_PRE_TBTT_TIMER, 6 << 4)?;

        self.modify_reg(CH_TIME_CFG, |reg| {
            CH_TIME_CFG_EIFS_BUSY.set(reg, 1);
            CH_TIME_CFG_NAV_BUSY.set(reg, 1);
            CH_TIME_CFG_RX_BUSY.set(reg, 1);
            CH_TIME_CFG_TX_BUSY.set(reg, 1);
            CH_TIME_CFG_TMR_EN.set(reg, 1);
        })?;
        Ok(())
    }

    /// Bring the radio up after the firmware load.
    ///
    /// Aborts on the first polling timeout, leaving the registers in an undefined state.
    pub fn enable_radio(&mut self) -> Result<(), Rt2800Error> {
        self.wait_wpdma_ready()?;
        self.init_registers()?;
        self.wait_bbp_rf_ready()?;

        // Boot signal to the firmware
        self.write_reg(H2M_BBP_AGENT, 0)?;
        self.write_reg(H2M_MAILBOX_CSR, 0)?;
        if self.chip.bus.is_usb() {
            self.write_reg(H2M_INT_SRC, 0)?;
        }
        self.mcu_request(MCU_BOOT_SIGNAL, 0, 0, 0)?;
        self.msleep(1);

        self.wait_bbp_ready()?;

        self.init_bbp()?;
        self.init_rfcsr()?;

        if self.chip.bus.is_usb()
            && matches!(self.chip.family, ChipFamily::Rt3070 | ChipFamily::Rt3071 | ChipFamily::Rt3572) {
            self.usleep(200);
            self.mcu_request(MCU_CURRENT, 0, 0, 0)?;
            self.usleep(10);
        }

        // TX first, RX once the DMA is armed
        self.modify_reg(MAC_SYS_CTRL, |reg| {
            MAC_SYS_CTRL_ENABLE_TX.set(reg, 1);
            MAC_SYS_CTRL_ENABLE_RX.set(reg, 0);
        })?;
        self.usleep(50);
        self.modify_reg(WPDMA_GLO_CFG, |reg| {
            WPDMA_GLO_CFG_ENABLE_TX_DMA.set(reg, 1);
            WPDMA_GLO_CFG_ENABLE_RX_DMA.set(reg, 1);
            WPDMA_GLO_CFG_TX_WRITEBACK_DONE.set(reg, 1);
        })?;
        self.modify_reg(MAC_SYS_CTRL, |reg| {
            MAC_SYS_CTRL_ENABLE_TX.set(reg, 1);
            MAC_SYS_CTRL_ENABLE_RX.set(reg, 1);
        })?;

        for (field, cmd) in [
            (EepromField::LedAgConf, MCU_LED_AG_CONF),
            (EepromField::LedActConf, MCU_LED_ACT_CONF),
            (EepromField::LedPolarity, MCU_LED_LED_POLARITY),
        ] {
            let [lo, hi] = self.eeprom.read(field).to_le_bytes();
            self.mcu_request(cmd, TOKEN_NO_INTR, lo, hi)?;
        }
        info!("Radio enabled");
        Ok(())
    }

    /// Stop the DMA and the MAC TX/RX paths.
    /// A DMA engine that never becomes idle is only reported.
    pub fn disable_radio(&mut self) -> Result<(), Rt2800Error> {
        self.disable_wpdma()?;
        if self.wait_wpdma_ready().is_err() {
            warn!("DMA still busy while disabling the radio");
        }
        self.modify_reg(MAC_SYS_CTRL, |reg| {
            MAC_SYS_CTRL_ENABLE_TX.set(reg, 0);
            MAC_SYS_CTRL_ENABLE_RX.set(reg, 0);
        })?;
        Ok(())
    }

    /// Configure which frames are forwarded to the host
    pub fn config_filter(&mut self, flags: FilterFlags) -> Result<(), Rt2800Error> {
        self.modify_reg(RX_FILTER_CFG, |reg| *reg = rx_filter_value(*reg, flags))?;
        Ok(())
    }

    /// State of the hardware radio switch (true when the radio is allowed)
    pub fn rfkill_poll(&mut self) -> Result<bool, Rt2800Error> {
        if self.chip.is(ChipFamily::Rt3290) {
            Ok(WLAN_GPIO_IN_BIT0.is_set(self.read_reg(WLAN_FUN_CTRL)?))
        } else {
            Ok(GPIO_CTRL_VAL2.is_set(self.read_reg(GPIO_CTRL)?))
        }
    }

    fn set_ant_diversity(&mut self, ant: Antenna) -> Result<(), Rt2800Error> {
        let eesk_pin = (ant == Antenna::A) as u8;
        if self.chip.bus.is_pci() {
            self.write_field(E2PROM_CSR, E2PROM_CSR_DATA_CLOCK, eesk_pin as u32)?;
        } else if self.chip.bus.is_usb() {
            self.mcu_request(MCU_ANT_SELECT, TOKEN_NO_INTR, eesk_pin, 0)?;
        }
        self.modify_reg(GPIO_CTRL, |reg| {
            GPIO_CTRL_DIR3.set(reg, 0);
            GPIO_CTRL_VAL3.set_bool(reg, ant == Antenna::B);
        })?;
        Ok(())
    }

    /// RT3572 with Bluetooth coexistence: GPIO band switch and LED mode
    fn config_3572bt_ant(&mut self) -> Result<(), Rt2800Error> {
        let a_band = self.channel.band == Band::A;
        self.modify_reg(GPIO_SWITCH, |reg| {
            GPIO_SWITCH_0.set_bool(reg, a_band);
            GPIO_SWITCH_1.set_bool(reg, a_band);
        })?;

        let mut reg = self.read_reg(LED_CFG)?;
        let polar = LED_CFG_LED_POLAR.is_set(reg);
        let (led_g_mode, led_r_mode) = if polar { (3, 0) } else { (0, 3) };
        if led_g_mode != LED_CFG_G_LED_MODE.get(reg) || led_r_mode != LED_CFG_R_LED_MODE.get(reg) {
            let led_ctrl = FREQ_LED_MODE.get(self.eeprom.read(EepromField::Freq));
            if led_ctrl == 0 || led_ctrl > 0x40 {
                LED_CFG_G_LED_MODE.set(&mut reg, led_g_mode);
                LED_CFG_R_LED_MODE.set(&mut reg, led_r_mode);
                self.write_reg(LED_CFG, reg)?;
            } else {
                self.mcu_request(MCU_BAND_SELECT, TOKEN_NO_INTR, ((led_g_mode << 2) | led_r_mode) as u8, 1)?;
            }
        }
        Ok(())
    }

    /// Configure the TX (BBP1) and RX (BBP3) antennas for the active chain counts
    pub fn config_ant(&mut self) -> Result<(), Rt2800Error> {
        let mut r1 = self.bbp_read(1)?;
        let mut r3 = self.bbp_read(3)?;
        let bt_3572 = self.chip.is(ChipFamily::Rt3572) && self.chip.caps.has_bt_coexist();
        if bt_3572 {
            self.config_3572bt_ant()?;
        }

        match self.tx_chain_num {
            1 => BBP1_TX_ANTENNA.set(&mut r1, 0),
            2 if bt_3572 => BBP1_TX_ANTENNA.set(&mut r1, 1),
            2 | 3 => BBP1_TX_ANTENNA.set(&mut r1, 2),
            _ => {}
        }

        match self.rx_chain_num {
            1 => {
                let diversity = matches!(self.chip.family,
                    ChipFamily::Rt3070 | ChipFamily::Rt3090 | ChipFamily::Rt3352 | ChipFamily::Rt3390)
                    && NIC_CONF1_ANT_DIVERSITY.get(self.eeprom.read(EepromField::NicConf1)) != 0;
                if diversity {
                    self.set_ant_diversity(self.rx_antenna)?;
                }
                BBP3_RX_ANTENNA.set(&mut r3, 0);
            }
            2 if bt_3572 => {
                BBP3_RX_ADC.set(&mut r3, 1);
                BBP3_RX_ANTENNA.set_bool(&mut r3, self.channel.band == Band::A);
                self.set_ant_diversity(Antenna::B)?;
            }
            2 => BBP3_RX_ANTENNA.set(&mut r3, 1),
            3 => BBP3_RX_ANTENNA.set(&mut r3, 2),
            _ => {}
        }

        self.bbp_write(3, r3)?;
        self.bbp_write(1, r1)?;

        if matches!(self.chip.family, ChipFamily::Rt3593 | ChipFamily::Rt3883) {
            self.bbp_write(86, if self.rx_chain_num == 1 { 0x00 } else { 0x46 })?;
        }
        debug!("Antennas: {} TX / {} RX", self.tx_chain_num, self.rx_chain_num);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_tables() {
        assert_eq!(fallback_chain(&[0, 0, 1, 2, 3, 4, 5, 6]), 0x6543_2100);
        assert_eq!(fallback_chain(&[8, 8, 9, 10, 11, 12, 13, 14]), 0xedcb_a988);
        assert_eq!(fallback_chain(&[0, 0, 1, 2]), 0x2100);
    }

    #[test]
    fn monitor_filter() {
        let reg = rx_filter_value(0, FilterFlags::MONITOR);
        assert!(!RX_FILTER_CFG_DROP_CRC_ERROR.is_set(reg));
        assert!(RX_FILTER_CFG_DROP_PHY_ERROR.is_set(reg));
        assert!(RX_FILTER_CFG_DROP_VER_ERROR.is_set(reg));
        assert!(!RX_FILTER_CFG_DROP_ACK.is_set(reg));
        assert!(!RX_FILTER_CFG_DROP_PSPOLL.is_set(reg));
        assert!(!RX_FILTER_CFG_DROP_NOT_TO_ME.is_set(reg));
    }

    #[test]
    fn strict_filter() {
        let reg = rx_filter_value(u32::MAX, FilterFlags::NONE);
        assert!(RX_FILTER_CFG_DROP_CRC_ERROR.is_set(reg));
        assert!(RX_FILTER_CFG_DROP_MULTICAST.is_set(reg));
        assert!(RX_FILTER_CFG_DROP_CNTL.is_set(reg));
        assert!(!RX_FILTER_CFG_DROP_BROADCAST.is_set(reg));
        assert!(!RX_FILTER_CFG_DROP_BA.is_set(reg));
        assert!(!RX_FILTER_CFG_DROP_DUPLICATE.is_set(reg));
    }

    #[test]
    fn flags_combine() {
        let flags = FilterFlags::FCSFAIL | FilterFlags::CONTROL;
        assert!(flags.contains(FilterFlags::CONTROL));
        assert!(!flags.contains(FilterFlags::PSPOLL));
        assert!(FilterFlags::MONITOR.contains(flags));
    }
}
