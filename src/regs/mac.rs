//! MAC/CSR register map: addresses and bit-fields of the 32-bit register space

use crate::field::Field32;

// RT3290 power and clock control

/// WLAN function control (RT3290 only)
pub const WLAN_FUN_CTRL: u32 = 0x0080;
pub const WLAN_EN: Field32 = Field32::new(0x0000_0001);
pub const WLAN_CLK_EN: Field32 = Field32::new(0x0000_0002);
pub const WLAN_RESET_RF: Field32 = Field32::new(0x0000_0004);
pub const WLAN_RESET: Field32 = Field32::new(0x0000_0008);
pub const PCIE_APP0_CLK_REQ: Field32 = Field32::new(0x0000_0010);
pub const FRC_WL_ANT_SET: Field32 = Field32::new(0x0000_0020);
pub const WLAN_GPIO_IN_BIT0: Field32 = Field32::new(0x0000_0100);
pub const WLAN_GPIO_OUT_OE_BIT_ALL: Field32 = Field32::new(0xff00_0000);

/// Combo control: crystal and PLL status (RT3290 only)
pub const CMB_CTRL: u32 = 0x0020;
pub const XTAL_RDY: Field32 = Field32::new(0x0040_0000);
pub const PLL_LD: Field32 = Field32::new(0x0080_0000);
pub const LDO_BGSEL: Field32 = Field32::new(0x3000_0000);
pub const LDO0_EN: Field32 = Field32::new(0x8000_0000);

/// eFuse control on RT3290
pub const EFUSE_CTRL_3290: u32 = 0x0024;
pub const EFUSE_DATA0_3290: u32 = 0x0028;
pub const EFUSE_DATA1_3290: u32 = 0x002c;
pub const EFUSE_DATA2_3290: u32 = 0x0030;
pub const EFUSE_DATA3_3290: u32 = 0x0034;

/// Ring oscillator control (RT3290 only)
pub const OSC_CTRL: u32 = 0x0038;
pub const OSC_REF_CYCLE: Field32 = Field32::new(0x0000_1fff);
pub const OSC_CAL_REQ: Field32 = Field32::new(0x4000_0000);
pub const OSC_ROSC_EN: Field32 = Field32::new(0x8000_0000);

/// Bluetooth coexistence configuration (RT3290 only)
pub const COEX_CFG0: u32 = 0x0040;
pub const COEX_CFG_ANT: Field32 = Field32::new(0xff00_0000);
pub const COEX_CFG2: u32 = 0x0048;
pub const BT_COEX_CFG1: Field32 = Field32::new(0xff00_0000);
pub const BT_COEX_CFG0: Field32 = Field32::new(0x00ff_0000);
pub const WL_COEX_CFG1: Field32 = Field32::new(0x0000_ff00);
pub const WL_COEX_CFG0: Field32 = Field32::new(0x0000_00ff);

/// PLL control (RT3290 only)
pub const PLL_CTRL: u32 = 0x0050;
pub const PLL_CONTROL: Field32 = Field32::new(0x0007_0000);

/// Undocumented PLL reset register poked by the RT3290 wake sequence
pub const PLL_RESET_3290: u32 = 0x0058;

/// Identification register on RT3290
pub const MAC_CSR0_3290: u32 = 0x0000;

// Host DMA

pub const INT_SOURCE_CSR: u32 = 0x0200;

/// EEPROM bit-bang interface, EESK doubles as antenna select on PCI boards
pub const E2PROM_CSR: u32 = 0x0004;
pub const E2PROM_CSR_DATA_CLOCK: Field32 = Field32::new(0x0000_0001);

/// WPDMA global configuration
pub const WPDMA_GLO_CFG: u32 = 0x0208;
pub const WPDMA_GLO_CFG_ENABLE_TX_DMA: Field32 = Field32::new(0x0000_0001);
pub const WPDMA_GLO_CFG_TX_DMA_BUSY: Field32 = Field32::new(0x0000_0002);
pub const WPDMA_GLO_CFG_ENABLE_RX_DMA: Field32 = Field32::new(0x0000_0004);
pub const WPDMA_GLO_CFG_RX_DMA_BUSY: Field32 = Field32::new(0x0000_0008);
pub const WPDMA_GLO_CFG_WP_DMA_BURST_SIZE: Field32 = Field32::new(0x0000_0030);
pub const WPDMA_GLO_CFG_TX_WRITEBACK_DONE: Field32 = Field32::new(0x0000_0040);
pub const WPDMA_GLO_CFG_BIG_ENDIAN: Field32 = Field32::new(0x0000_0080);
pub const WPDMA_GLO_CFG_RX_HDR_SCATTER: Field32 = Field32::new(0x0000_ff00);
pub const WPDMA_GLO_CFG_HDR_SEG_LEN: Field32 = Field32::new(0xffff_0000);

/// PCI auxiliary control
pub const AUX_CTRL: u32 = 0x010c;
pub const AUX_CTRL_WAKE_PCIE_EN: Field32 = Field32::new(0x0000_0002);
pub const AUX_CTRL_FORCE_PCIE_CLK: Field32 = Field32::new(0x0000_0400);

/// LED pad option, bit 0 switches the LED outputs to open drain
pub const OPT_14_CSR: u32 = 0x0114;
pub const OPT_14_CSR_BIT0: Field32 = Field32::new(0x0000_0001);

/// GPIO control: output values and direction
pub const GPIO_CTRL: u32 = 0x0228;
pub const GPIO_CTRL_VAL2: Field32 = Field32::new(0x0000_0004);
pub const GPIO_CTRL_VAL3: Field32 = Field32::new(0x0000_0008);
pub const GPIO_CTRL_VAL4: Field32 = Field32::new(0x0000_0010);
pub const GPIO_CTRL_VAL6: Field32 = Field32::new(0x0000_0040);
pub const GPIO_CTRL_VAL7: Field32 = Field32::new(0x0000_0080);
pub const GPIO_CTRL_DIR3: Field32 = Field32::new(0x0000_0800);
pub const GPIO_CTRL_DIR4: Field32 = Field32::new(0x0000_1000);
pub const GPIO_CTRL_DIR6: Field32 = Field32::new(0x0000_4000);
pub const GPIO_CTRL_DIR7: Field32 = Field32::new(0x0000_8000);
pub const GPIO_CTRL_VAL8: Field32 = Field32::new(0x0001_0000);
pub const GPIO_CTRL_DIR8: Field32 = Field32::new(0x0100_0000);

/// Microsecond cycle counter
pub const US_CYC_CNT: u32 = 0x02a4;
pub const US_CYC_CNT_CLOCK_CYCLE: Field32 = Field32::new(0x0000_00ff);

// Packet buffer and MCU

/// Packet buffer system control
pub const PBF_SYS_CTRL: u32 = 0x0400;
pub const PBF_SYS_CTRL_READY: Field32 = Field32::new(0x0000_0080);

/// Host to MCU command register
pub const HOST_CMD_CSR: u32 = 0x0404;
pub const HOST_CMD_CSR_HOST_COMMAND: Field32 = Field32::new(0x0000_00ff);

pub const PBF_CFG: u32 = 0x0408;
pub const PBF_MAX_PCNT: u32 = 0x040c;

// RF indirect access

/// RFCSR indirect access
pub const RF_CSR_CFG: u32 = 0x0500;
pub const RF_CSR_CFG_DATA: Field32 = Field32::new(0x0000_00ff);
pub const RF_CSR_CFG_REGNUM: Field32 = Field32::new(0x0000_3f00);
pub const RF_CSR_CFG_WRITE: Field32 = Field32::new(0x0001_0000);
pub const RF_CSR_CFG_BUSY: Field32 = Field32::new(0x0002_0000);
pub const RF_CSR_CFG_REGNUM_MT7620: Field32 = Field32::new(0x0000_03ff);
pub const RF_CSR_CFG_WRITE_MT7620: Field32 = Field32::new(0x0000_0400);
pub const RF_CSR_CFG_BUSY_MT7620: Field32 = Field32::new(0x0000_0800);
pub const RF_CSR_CFG_DATA_MT7620: Field32 = Field32::new(0x00ff_0000);

/// eFuse control
pub const EFUSE_CTRL: u32 = 0x0580;
pub const EFUSE_CTRL_MODE: Field32 = Field32::new(0x0000_00c0);
pub const EFUSE_CTRL_ADDRESS_IN: Field32 = Field32::new(0x03fe_0000);
pub const EFUSE_CTRL_KICK: Field32 = Field32::new(0x4000_0000);
pub const EFUSE_CTRL_PRESENT: Field32 = Field32::new(0x8000_0000);
pub const EFUSE_DATA0: u32 = 0x0590;
pub const EFUSE_DATA1: u32 = 0x0594;
pub const EFUSE_DATA2: u32 = 0x0598;
pub const EFUSE_DATA3: u32 = 0x059c;

/// RF override control used during filter calibration
pub const RF_CONTROL0: u32 = 0x0518;
pub const RF_BYPASS0: u32 = 0x051c;
pub const RF_CONTROL1: u32 = 0x0520;
pub const RF_BYPASS1: u32 = 0x0524;
pub const RF_CONTROL2: u32 = 0x0528;
pub const RF_BYPASS2: u32 = 0x052c;
pub const RF_CONTROL3: u32 = 0x0530;
pub const RF_BYPASS3: u32 = 0x0534;

/// LDO configuration
pub const LDO_CFG0: u32 = 0x05d4;
pub const LDO_CFG0_LDO_CORE_VLEVEL: Field32 = Field32::new(0x1c00_0000);
pub const LDO_CFG0_BGSEL: Field32 = Field32::new(0x0300_0000);

/// GPIO function switch
pub const GPIO_SWITCH: u32 = 0x05dc;
pub const GPIO_SWITCH_0: Field32 = Field32::new(0x0000_0001);
pub const GPIO_SWITCH_1: Field32 = Field32::new(0x0000_0002);
pub const GPIO_SWITCH_2: Field32 = Field32::new(0x0000_0004);
pub const GPIO_SWITCH_3: Field32 = Field32::new(0x0000_0008);
pub const GPIO_SWITCH_4: Field32 = Field32::new(0x0000_0010);
pub const GPIO_SWITCH_5: Field32 = Field32::new(0x0000_0020);
pub const GPIO_SWITCH_6: Field32 = Field32::new(0x0000_0040);
pub const GPIO_SWITCH_7: Field32 = Field32::new(0x0000_0080);

// MAC core

/// Identification register: ASIC version and revision
pub const MAC_CSR0: u32 = 0x1000;
pub const MAC_CSR0_CHIPSET: Field32 = Field32::new(0xffff_0000);
pub const MAC_CSR0_REVISION: Field32 = Field32::new(0x0000_ffff);

/// MAC system control
pub const MAC_SYS_CTRL: u32 = 0x1004;
pub const MAC_SYS_CTRL_RESET_CSR: Field32 = Field32::new(0x0000_0001);
pub const MAC_SYS_CTRL_RESET_BBP: Field32 = Field32::new(0x0000_0002);
pub const MAC_SYS_CTRL_ENABLE_TX: Field32 = Field32::new(0x0000_0004);
pub const MAC_SYS_CTRL_ENABLE_RX: Field32 = Field32::new(0x0000_0008);

/// Maximum frame length
pub const MAX_LEN_CFG: u32 = 0x1018;
pub const MAX_LEN_CFG_MAX_MPDU: Field32 = Field32::new(0x0000_0fff);
pub const MAX_LEN_CFG_MAX_PSDU: Field32 = Field32::new(0x0000_3000);
pub const MAX_LEN_CFG_MIN_PSDU: Field32 = Field32::new(0x0000_c000);
pub const MAX_LEN_CFG_MIN_MPDU: Field32 = Field32::new(0x000f_0000);

/// BBP indirect access
pub const BBP_CSR_CFG: u32 = 0x101c;
pub const BBP_CSR_CFG_VALUE: Field32 = Field32::new(0x0000_00ff);
pub const BBP_CSR_CFG_REGNUM: Field32 = Field32::new(0x0000_ff00);
pub const BBP_CSR_CFG_READ_CONTROL: Field32 = Field32::new(0x0001_0000);
pub const BBP_CSR_CFG_BUSY: Field32 = Field32::new(0x0002_0000);
pub const BBP_CSR_CFG_BBP_PAR_DUR: Field32 = Field32::new(0x0004_0000);
pub const BBP_CSR_CFG_BBP_RW_MODE: Field32 = Field32::new(0x0008_0000);

/// Legacy RF word interface
pub const RF_CSR_CFG0: u32 = 0x1020;
pub const RF_CSR_CFG0_REG_VALUE_BW: Field32 = Field32::new(0x00ff_ffff);
pub const RF_CSR_CFG0_STANDBYMODE: Field32 = Field32::new(0x0100_0000);
pub const RF_CSR_CFG0_SEL: Field32 = Field32::new(0x0200_0000);
pub const RF_CSR_CFG0_BITWIDTH: Field32 = Field32::new(0x7c00_0000);
pub const RF_CSR_CFG0_BUSY: Field32 = Field32::new(0x8000_0000);

/// LED timing configuration
pub const LED_CFG: u32 = 0x102c;
pub const LED_CFG_ON_PERIOD: Field32 = Field32::new(0x0000_00ff);
pub const LED_CFG_OFF_PERIOD: Field32 = Field32::new(0x0000_ff00);
pub const LED_CFG_SLOW_BLINK_PERIOD: Field32 = Field32::new(0x003f_0000);
pub const LED_CFG_R_LED_MODE: Field32 = Field32::new(0x0300_0000);
pub const LED_CFG_G_LED_MODE: Field32 = Field32::new(0x0c00_0000);
pub const LED_CFG_Y_LED_MODE: Field32 = Field32::new(0x3000_0000);
pub const LED_CFG_LED_POLAR: Field32 = Field32::new(0x4000_0000);

/// Block-ack window size forcing
pub const AMPDU_BA_WINSIZE: u32 = 0x1040;
pub const AMPDU_BA_WINSIZE_FORCE_WINSIZE_ENABLE: Field32 = Field32::new(0x0000_0020);
pub const AMPDU_BA_WINSIZE_FORCE_WINSIZE: Field32 = Field32::new(0x0000_001f);

/// SIFS/EIFS timing
pub const XIFS_TIME_CFG: u32 = 0x1100;
pub const XIFS_TIME_CFG_CCKM_SIFS_TIME: Field32 = Field32::new(0x0000_00ff);
pub const XIFS_TIME_CFG_OFDM_SIFS_TIME: Field32 = Field32::new(0x0000_ff00);
pub const XIFS_TIME_CFG_OFDM_XIFS_TIME: Field32 = Field32::new(0x000f_0000);
pub const XIFS_TIME_CFG_EIFS: Field32 = Field32::new(0x1ff0_0000);
pub const XIFS_TIME_CFG_BB_RXEND_ENABLE: Field32 = Field32::new(0x2000_0000);

/// Backoff slot timing
pub const BKOFF_SLOT_CFG: u32 = 0x1104;
pub const BKOFF_SLOT_CFG_SLOT_TIME: Field32 = Field32::new(0x0000_00ff);
pub const BKOFF_SLOT_CFG_CC_DELAY_TIME: Field32 = Field32::new(0x0000_ff00);

/// Channel time statistics configuration
pub const CH_TIME_CFG: u32 = 0x110c;
pub const CH_TIME_CFG_TMR_EN: Field32 = Field32::new(0x0000_0001);
pub const CH_TIME_CFG_TX_BUSY: Field32 = Field32::new(0x0000_0002);
pub const CH_TIME_CFG_RX_BUSY: Field32 = Field32::new(0x0000_0004);
pub const CH_TIME_CFG_NAV_BUSY: Field32 = Field32::new(0x0000_0008);
pub const CH_TIME_CFG_EIFS_BUSY: Field32 = Field32::new(0x0000_0010);

/// Beacon timing
pub const BCN_TIME_CFG: u32 = 0x1114;
pub const BCN_TIME_CFG_BEACON_INTERVAL: Field32 = Field32::new(0x0000_ffff);
pub const BCN_TIME_CFG_TSF_TICKING: Field32 = Field32::new(0x0001_0000);
pub const BCN_TIME_CFG_TSF_SYNC: Field32 = Field32::new(0x0006_0000);
pub const BCN_TIME_CFG_TBTT_ENABLE: Field32 = Field32::new(0x0008_0000);
pub const BCN_TIME_CFG_BEACON_GEN: Field32 = Field32::new(0x0010_0000);
pub const BCN_TIME_CFG_TX_TIME_COMPENSATE: Field32 = Field32::new(0xf000_0000);

/// Interrupt timer configuration
pub const INT_TIMER_CFG: u32 = 0x1128;
pub const INT_TIMER_CFG_PRE_TBTT_TIMER: Field32 = Field32::new(0x0000_ffff);

/// Channel idle/busy statistics (clear on read)
pub const CH_IDLE_STA: u32 = 0x1130;
pub const CH_BUSY_STA: u32 = 0x1134;
pub const CH_BUSY_STA_SEC: u32 = 0x1138;

/// MAC status
pub const MAC_STATUS_CFG: u32 = 0x1200;
pub const MAC_STATUS_CFG_BBP_RF_BUSY: Field32 = Field32::new(0x0000_0003);

/// Auto wakeup configuration
pub const AUTOWAKEUP_CFG: u32 = 0x1208;

pub const PWR_PIN_CFG: u32 = 0x1204;

// TX configuration

/// PA/LNA and TR switch pin control
pub const TX_PIN_CFG: u32 = 0x1328;
pub const TX_PIN_CFG_PA_PE_DISABLE: u32 = 0xfcff_fff0;
pub const TX_PIN_CFG_PA_PE_A0_EN: Field32 = Field32::new(0x0000_0001);
pub const TX_PIN_CFG_PA_PE_G0_EN: Field32 = Field32::new(0x0000_0002);
pub const TX_PIN_CFG_PA_PE_A1_EN: Field32 = Field32::new(0x0000_0004);
pub const TX_PIN_CFG_PA_PE_G1_EN: Field32 = Field32::new(0x0000_0008);
pub const TX_PIN_CFG_LNA_PE_A0_EN: Field32 = Field32::new(0x0000_0100);
pub const TX_PIN_CFG_LNA_PE_G0_EN: Field32 = Field32::new(0x0000_0200);
pub const TX_PIN_CFG_LNA_PE_A1_EN: Field32 = Field32::new(0x0000_0400);
pub const TX_PIN_CFG_LNA_PE_G1_EN: Field32 = Field32::new(0x0000_0800);
pub const TX_PIN_CFG_RFTR_EN: Field32 = Field32::new(0x0001_0000);
pub const TX_PIN_CFG_TRSW_EN: Field32 = Field32::new(0x0004_0000);
pub const TX_PIN_CFG_RFRX_EN: Field32 = Field32::new(0x0010_0000);
pub const TX_PIN_CFG_PA_PE_A2_EN: Field32 = Field32::new(0x0100_0000);
pub const TX_PIN_CFG_PA_PE_G2_EN: Field32 = Field32::new(0x0200_0000);
pub const TX_PIN_CFG_LNA_PE_A2_EN: Field32 = Field32::new(0x1000_0000);
pub const TX_PIN_CFG_LNA_PE_G2_EN: Field32 = Field32::new(0x2000_0000);

/// Band selection
pub const TX_BAND_CFG: u32 = 0x132c;
pub const TX_BAND_CFG_HT40_MINUS: Field32 = Field32::new(0x0000_0001);
pub const TX_BAND_CFG_A: Field32 = Field32::new(0x0000_0002);
pub const TX_BAND_CFG_BG: Field32 = Field32::new(0x0000_0004);

pub const TX_SW_CFG0: u32 = 0x1330;
pub const TX_SW_CFG1: u32 = 0x1334;
pub const TX_SW_CFG2: u32 = 0x1338;

/// TXOP truncation control
pub const TXOP_CTRL_CFG: u32 = 0x1340;
pub const TXOP_CTRL_CFG_TIMEOUT_TRUN_EN: Field32 = Field32::new(0x0000_0001);
pub const TXOP_CTRL_CFG_AC_TRUN_EN: Field32 = Field32::new(0x0000_0002);
pub const TXOP_CTRL_CFG_TXRATEGRP_TRUN_EN: Field32 = Field32::new(0x0000_0004);
pub const TXOP_CTRL_CFG_USER_MODE_TRUN_EN: Field32 = Field32::new(0x0000_0008);
pub const TXOP_CTRL_CFG_MIMO_PS_TRUN_EN: Field32 = Field32::new(0x0000_0010);
pub const TXOP_CTRL_CFG_RESERVED_TRUN_EN: Field32 = Field32::new(0x0000_0020);
pub const TXOP_CTRL_CFG_LSIG_TXOP_EN: Field32 = Field32::new(0x0000_0040);
pub const TXOP_CTRL_CFG_EXT_CCA_EN: Field32 = Field32::new(0x0000_0080);
pub const TXOP_CTRL_CFG_EXT_CCA_DLY: Field32 = Field32::new(0x0000_ff00);
pub const TXOP_CTRL_CFG_EXT_CWMIN: Field32 = Field32::new(0x000f_0000);

/// RTS configuration
pub const TX_RTS_CFG: u32 = 0x1344;
pub const TX_RTS_CFG_AUTO_RTS_RETRY_LIMIT: Field32 = Field32::new(0x0000_00ff);
pub const TX_RTS_CFG_RTS_THRES: Field32 = Field32::new(0x00ff_ff00);
pub const TX_RTS_CFG_RTS_FBK_EN: Field32 = Field32::new(0x0100_0000);

/// TX timeouts
pub const TX_TIMEOUT_CFG: u32 = 0x1348;
pub const TX_TIMEOUT_CFG_MPDU_LIFETIME: Field32 = Field32::new(0x0000_00f0);
pub const TX_TIMEOUT_CFG_RX_ACK_TIMEOUT: Field32 = Field32::new(0x0000_ff00);
pub const TX_TIMEOUT_CFG_TX_OP_TIMEOUT: Field32 = Field32::new(0x00ff_0000);

/// TX retry configuration
pub const TX_RTY_CFG: u32 = 0x134c;
pub const TX_RTY_CFG_SHORT_RTY_LIMIT: Field32 = Field32::new(0x0000_00ff);
pub const TX_RTY_CFG_LONG_RTY_LIMIT: Field32 = Field32::new(0x0000_ff00);
pub const TX_RTY_CFG_LONG_RTY_THRE: Field32 = Field32::new(0x0fff_0000);
pub const TX_RTY_CFG_NON_AGG_RTY_MODE: Field32 = Field32::new(0x1000_0000);
pub const TX_RTY_CFG_AGG_RTY_MODE: Field32 = Field32::new(0x2000_0000);
pub const TX_RTY_CFG_TX_AUTO_FB_ENABLE: Field32 = Field32::new(0x4000_0000);

/// Link feedback configuration
pub const TX_LINK_CFG: u32 = 0x1350;
pub const TX_LINK_CFG_REMOTE_MFB_LIFETIME: Field32 = Field32::new(0x0000_00ff);
pub const TX_LINK_CFG_MFB_ENABLE: Field32 = Field32::new(0x0000_0100);
pub const TX_LINK_CFG_REMOTE_UMFS_ENABLE: Field32 = Field32::new(0x0000_0200);
pub const TX_LINK_CFG_TX_MRQ_EN: Field32 = Field32::new(0x0000_0400);
pub const TX_LINK_CFG_TX_RDG_EN: Field32 = Field32::new(0x0000_0800);
pub const TX_LINK_CFG_TX_CF_ACK_EN: Field32 = Field32::new(0x0000_1000);
pub const TX_LINK_CFG_REMOTE_MFB: Field32 = Field32::new(0x00ff_0000);
pub const TX_LINK_CFG_REMOTE_MFS: Field32 = Field32::new(0xff00_0000);

/// HT MCS fallback tables (4 bits per MCS)
pub const HT_FBK_CFG0: u32 = 0x1354;
pub const HT_FBK_CFG1: u32 = 0x1358;
/// Legacy rate fallback tables (4 bits per rate)
pub const LG_FBK_CFG0: u32 = 0x135c;
pub const LG_FBK_CFG1: u32 = 0x1360;

/// Protection configuration registers, all sharing the same layout
pub const CCK_PROT_CFG: u32 = 0x1364;
pub const OFDM_PROT_CFG: u32 = 0x1368;
pub const MM20_PROT_CFG: u32 = 0x136c;
pub const MM40_PROT_CFG: u32 = 0x1370;
pub const GF20_PROT_CFG: u32 = 0x1374;
pub const GF40_PROT_CFG: u32 = 0x1378;
pub const PROT_CFG_PROTECT_RATE: Field32 = Field32::new(0x0000_ffff);
pub const PROT_CFG_PROTECT_CTRL: Field32 = Field32::new(0x0003_0000);
pub const PROT_CFG_PROTECT_NAV_SHORT: Field32 = Field32::new(0x0004_0000);
pub const PROT_CFG_TX_OP_ALLOW_CCK: Field32 = Field32::new(0x0010_0000);
pub const PROT_CFG_TX_OP_ALLOW_OFDM: Field32 = Field32::new(0x0020_0000);
pub const PROT_CFG_TX_OP_ALLOW_MM20: Field32 = Field32::new(0x0040_0000);
pub const PROT_CFG_TX_OP_ALLOW_MM40: Field32 = Field32::new(0x0080_0000);
pub const PROT_CFG_TX_OP_ALLOW_GF20: Field32 = Field32::new(0x0100_0000);
pub const PROT_CFG_TX_OP_ALLOW_GF40: Field32 = Field32::new(0x0200_0000);
pub const PROT_CFG_RTS_TH_EN: Field32 = Field32::new(0x0400_0000);

pub const EXP_ACK_TIME: u32 = 0x1380;

/// TX beamforming configuration (RT3883)
pub const TX_TXBF_CFG_0: u32 = 0x138c;
pub const TX_TXBF_CFG_3: u32 = 0x1398;

/// 3-stream fallback tables (RT3883)
pub const TX_FBK_CFG_3S_0: u32 = 0x13c4;
pub const TX_FBK_CFG_3S_1: u32 = 0x13c8;

// RX configuration

/// RX filter
pub const RX_FILTER_CFG: u32 = 0x1400;
pub const RX_FILTER_CFG_DROP_CRC_ERROR: Field32 = Field32::new(0x0000_0001);
pub const RX_FILTER_CFG_DROP_PHY_ERROR: Field32 = Field32::new(0x0000_0002);
pub const RX_FILTER_CFG_DROP_NOT_TO_ME: Field32 = Field32::new(0x0000_0004);
pub const RX_FILTER_CFG_DROP_NOT_MY_BSSD: Field32 = Field32::new(0x0000_0008);
pub const RX_FILTER_CFG_DROP_VER_ERROR: Field32 = Field32::new(0x0000_0010);
pub const RX_FILTER_CFG_DROP_MULTICAST: Field32 = Field32::new(0x0000_0020);
pub const RX_FILTER_CFG_DROP_BROADCAST: Field32 = Field32::new(0x0000_0040);
pub const RX_FILTER_CFG_DROP_DUPLICATE: Field32 = Field32::new(0x0000_0080);
pub const RX_FILTER_CFG_DROP_CF_END_ACK: Field32 = Field32::new(0x0000_0100);
pub const RX_FILTER_CFG_DROP_CF_END: Field32 = Field32::new(0x0000_0200);
pub const RX_FILTER_CFG_DROP_ACK: Field32 = Field32::new(0x0000_0400);
pub const RX_FILTER_CFG_DROP_CTS: Field32 = Field32::new(0x0000_0800);
pub const RX_FILTER_CFG_DROP_RTS: Field32 = Field32::new(0x0000_1000);
pub const RX_FILTER_CFG_DROP_PSPOLL: Field32 = Field32::new(0x0000_2000);
pub const RX_FILTER_CFG_DROP_BA: Field32 = Field32::new(0x0000_4000);
pub const RX_FILTER_CFG_DROP_BAR: Field32 = Field32::new(0x0000_8000);
pub const RX_FILTER_CFG_DROP_CNTL: Field32 = Field32::new(0x0001_0000);

/// Auto responder configuration
pub const AUTO_RSP_CFG: u32 = 0x1404;
pub const AUTO_RSP_CFG_AUTORESPONDER: Field32 = Field32::new(0x0000_0001);
pub const AUTO_RSP_CFG_BAC_ACK_POLICY: Field32 = Field32::new(0x0000_0002);
pub const AUTO_RSP_CFG_CTS_40_MMODE: Field32 = Field32::new(0x0000_0004);
pub const AUTO_RSP_CFG_CTS_40_MREF: Field32 = Field32::new(0x0000_0008);
pub const AUTO_RSP_CFG_AR_PREAMBLE: Field32 = Field32::new(0x0000_0010);
pub const AUTO_RSP_CFG_DUAL_CTS_EN: Field32 = Field32::new(0x0000_0040);
pub const AUTO_RSP_CFG_ACK_CTS_PSM_BIT: Field32 = Field32::new(0x0000_0080);

pub const LEGACY_BASIC_RATE: u32 = 0x1408;
pub const HT_BASIC_RATE: u32 = 0x140c;

pub const TXOP_HLDR_ET: u32 = 0x1608;

// Statistics (clear on read)

pub const RX_STA_CNT0: u32 = 0x1700;
pub const RX_STA_CNT0_CRC_ERR: Field32 = Field32::new(0x0000_ffff);
pub const RX_STA_CNT0_PHY_ERR: Field32 = Field32::new(0xffff_0000);
pub const RX_STA_CNT1: u32 = 0x1704;
pub const RX_STA_CNT1_FALSE_CCA: Field32 = Field32::new(0x0000_ffff);
pub const RX_STA_CNT1_PLCP_ERR: Field32 = Field32::new(0xffff_0000);
pub const RX_STA_CNT2: u32 = 0x1708;
pub const TX_STA_CNT0: u32 = 0x170c;
pub const TX_STA_CNT1: u32 = 0x1710;
pub const TX_STA_CNT2: u32 = 0x1714;

// Station and key tables

/// Station (WCID) table: 8 bytes per entry
pub const MAC_WCID_BASE: u32 = 0x1800;
pub const MAC_WCID_ENTRY_SIZE: usize = 8;
/// IV/EIV table: 8 bytes per entry
pub const MAC_IVEIV_TABLE_BASE: u32 = 0x6000;
/// WCID attribute table: 4 bytes per entry
pub const MAC_WCID_ATTRIBUTE_BASE: u32 = 0x6800;
/// Shared key mode table: 4 bytes per entry
pub const SHARED_KEY_MODE_BASE: u32 = 0x7000;
/// Number of entries in the station table
pub const WCID_COUNT: u32 = 256;
/// Number of shared key mode entries
pub const SHARED_KEY_MODE_COUNT: u32 = 4;

pub const fn mac_wcid_entry(idx: u32) -> u32 {
    MAC_WCID_BASE + idx * MAC_WCID_ENTRY_SIZE as u32
}

pub const fn mac_wcid_attr_entry(idx: u32) -> u32 {
    MAC_WCID_ATTRIBUTE_BASE + idx * 4
}

pub const fn mac_iveiv_entry(idx: u32) -> u32 {
    MAC_IVEIV_TABLE_BASE + idx * 8
}

pub const fn shared_key_mode_entry(idx: u32) -> u32 {
    SHARED_KEY_MODE_BASE + idx * 4
}

// Beacon slots

/// Beacon slots 0-3, 512 bytes apart
pub const HW_BEACON_BASE0: u32 = 0x7800;
/// Beacon slots 4-5
pub const HW_BEACON_BASE4: u32 = 0x7200;
/// Beacon slots 6-7, growing downward
pub const HW_BEACON_BASE6: u32 = 0x5dc0;
pub const HW_BEACON_COUNT: u32 = 8;
/// TX descriptor at the head of a beacon slot
pub const TXWI_DESC_SIZE_4WORDS: u32 = 16;
pub const TXWI_DESC_SIZE_5WORDS: u32 = 20;

pub const fn hw_beacon_base(idx: u32) -> u32 {
    if idx < 4 {
        HW_BEACON_BASE0 + idx * 0x200
    } else if idx < 6 {
        HW_BEACON_BASE4 + (idx - 4) * 0x200
    } else {
        HW_BEACON_BASE6 - (idx - 6) * 0x200
    }
}

// Host to MCU mailbox

/// Host to MCU mailbox
pub const H2M_MAILBOX_CSR: u32 = 0x7010;
pub const H2M_MAILBOX_CSR_ARG0: Field32 = Field32::new(0x0000_00ff);
pub const H2M_MAILBOX_CSR_ARG1: Field32 = Field32::new(0x0000_ff00);
pub const H2M_MAILBOX_CSR_CMD_TOKEN: Field32 = Field32::new(0x00ff_0000);
pub const H2M_MAILBOX_CSR_OWNER: Field32 = Field32::new(0xff00_0000);
pub const H2M_MAILBOX_CID: u32 = 0x7014;
pub const H2M_MAILBOX_STATUS: u32 = 0x701c;
pub const H2M_INT_SRC: u32 = 0x7024;
pub const H2M_BBP_AGENT: u32 = 0x7028;

/// MCU commands sent through the mailbox
pub const MCU_SLEEP: u8 = 0x30;
pub const MCU_WAKEUP: u8 = 0x31;
pub const MCU_RADIO_OFF: u8 = 0x35;
pub const MCU_CURRENT: u8 = 0x36;
pub const MCU_LED: u8 = 0x50;
pub const MCU_LED_STRENGTH: u8 = 0x51;
pub const MCU_LED_AG_CONF: u8 = 0x52;
pub const MCU_LED_ACT_CONF: u8 = 0x53;
pub const MCU_LED_LED_POLARITY: u8 = 0x54;
pub const MCU_BOOT_SIGNAL: u8 = 0x72;
pub const MCU_ANT_SELECT: u8 = 0x73;
pub const MCU_FREQ_OFFSET: u8 = 0x74;
pub const MCU_BAND_SELECT: u8 = 0x91;
pub const MCU_BBP_SIGNAL: u8 = 0x80;

/// Token used by the host for requests that do not expect a reply
pub const TOKEN_NO_INTR: u8 = 0xff;

/// Firmware image base address on the register space
pub const FIRMWARE_IMAGE_BASE: u32 = 0x3000;
