//! # Firmware validation and loading
//!
//! Firmware images are 4kB (USB devices and RT3290) or 8kB, and bundles may hold several images back to back.
//! Each image ends with a big-endian CRC-16/CCITT of the rest of the image.
//!
//! ## Available Methods
//! - [`check_firmware`](Rt2800::check_firmware) - Validate length, variant and checksum of an image
//! - [`load_firmware`](Rt2800::load_firmware) - Wake the chip, transfer the image and run the boot handshake
//! - [`enable_wlan_rt3290`](Rt2800::enable_wlan_rt3290) - Power up the RT3290 radio subsystem

use embedded_hal::blocking::delay::DelayUs;

use crate::indirect::RegisterBank;
use crate::regs::mac::*;
use crate::{ChipFamily, RegisterBus, Rt2800, Rt2800Error};

/// Image size for USB devices and RT3290
pub const FIRMWARE_SIZE_SMALL: usize = 4096;
/// Image size for PCI and SoC devices
pub const FIRMWARE_SIZE_LARGE: usize = 8192;

/// Reflected CRC-16/CCITT lookup table (polynomial 0x8408)
const CRC_CCITT_TABLE: [u16; 256] = {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0x8408 } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// CRC-16/CCITT (reflected) starting from `crc`
pub fn crc_ccitt(crc: u16, data: &[u8]) -> u16 {
    data.iter().fold(crc, |crc, &b| (crc >> 8) ^ CRC_CCITT_TABLE[((crc ^ b as u16) & 0xff) as usize])
}

/// Check the trailing checksum of one image.
///
/// The reflected CRC comes out byte-swapped compared to the value stored,
/// so the stored big-endian word matches the CRC read as little-endian.
pub fn firmware_crc_ok(image: &[u8]) -> bool {
    let Some((body, tail)) = image.split_last_chunk::<2>() else {
        return false;
    };
    crc_ccitt(0xffff, body) == u16::from_le_bytes(*tail)
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    /// Expected size of one firmware image for this device
    pub fn firmware_size(&self) -> usize {
        if self.chip.bus.is_usb() || self.chip.is(ChipFamily::Rt3290) {
            FIRMWARE_SIZE_SMALL
        } else {
            FIRMWARE_SIZE_LARGE
        }
    }

    /// Validate a firmware file: length, variant and per-image checksum
    pub fn check_firmware(&self, data: &[u8]) -> Result<(), Rt2800Error> {
        let fw_len = self.firmware_size();
        if data.is_empty() || data.len() % fw_len != 0 {
            return Err(Rt2800Error::FirmwareBadLength(data.len()));
        }

        // Most USB chips need one of the upper images of a bundle
        if self.chip.bus.is_usb()
            && !matches!(self.chip.family, ChipFamily::Rt2860 | ChipFamily::Rt2872 | ChipFamily::Rt3070)
            && data.len() == fw_len
        {
            return Err(Rt2800Error::FirmwareBadVersion);
        }

        for (chunk, image) in data.chunks(fw_len).enumerate() {
            if !firmware_crc_ok(image) {
                error!("Firmware checksum mismatch in image {}", chunk);
                return Err(Rt2800Error::FirmwareBadCrc { chunk });
            }
        }
        Ok(())
    }

    /// Power up the RT3290 WLAN function and wait for PLL lock and crystal ready.
    ///
    /// Each failed wait resets the PLL and starts over, up to `wlan_enable_retries` times.
    pub fn enable_wlan_rt3290(&mut self) -> Result<(), Rt2800Error> {
        let delay = self.config.busy_delay;
        let attempts = self.config.busy_count;

        self.modify_reg(WLAN_FUN_CTRL, |reg| {
            WLAN_GPIO_OUT_OE_BIT_ALL.set(reg, 0xff);
            FRC_WL_ANT_SET.set(reg, 1);
            WLAN_CLK_EN.set(reg, 0);
            WLAN_EN.set(reg, 1);
        })?;
        self.sleep(delay);

        let mut retries = 0;
        loop {
            let locked = self.poll_reg(RegisterBank::Csr, CMB_CTRL, attempts, delay,
                |reg| PLL_LD.is_set(reg) && XTAL_RDY.is_set(reg));
            match locked {
                Ok(_) => retries = 0,
                Err(Rt2800Error::RegisterBusyTimeout { .. }) => {
                    if retries >= self.config.wlan_enable_retries {
                        error!("WLAN PLL never locked");
                        return Err(Rt2800Error::HardwareUnstable);
                    }
                    warn!("WLAN PLL not locked, resetting (retry {})", retries);
                    for value in [0x018, 0x418, 0x618] {
                        self.write_reg(PLL_RESET_3290, value)?;
                        self.sleep(delay);
                    }
                    retries += 1;
                }
                Err(e) => return Err(e),
            }

            let mut reg = self.modify_reg(WLAN_FUN_CTRL, |reg| {
                PCIE_APP0_CLK_REQ.set(reg, 0);
                WLAN_CLK_EN.set(reg, 1);
                WLAN_RESET.set(reg, 1);
            })?;
            self.usleep(10);
            WLAN_RESET.set(&mut reg, 0);
            self.write_reg(WLAN_FUN_CTRL, reg)?;
            self.usleep(10);
            self.write_reg(INT_SOURCE_CSR, 0x7fff_ffff)?;

            if retries == 0 {
                return Ok(());
            }
        }
    }

    /// Validate and transfer a firmware file, then run the boot handshake
    pub fn load_firmware(&mut self, data: &[u8]) -> Result<(), Rt2800Error> {
        self.check_firmware(data)?;

        if self.chip.is(ChipFamily::Rt3290) {
            self.enable_wlan_rt3290()?;
        }

        // Without this wake-up the load hangs when the interface comes up again
        self.write_reg(AUTOWAKEUP_CFG, 0)?;
        self.wait_csr_ready()?;
        info!("CSR ready, loading firmware");

        if self.chip.bus.is_pci() {
            if matches!(self.chip.family,
                ChipFamily::Rt3290 | ChipFamily::Rt3572 | ChipFamily::Rt5390 | ChipFamily::Rt5392)
            {
                self.modify_reg(AUX_CTRL, |reg| {
                    AUX_CTRL_FORCE_PCIE_CLK.set(reg, 1);
                    AUX_CTRL_WAKE_PCIE_EN.set(reg, 1);
                })?;
            }
            self.write_reg(PWR_PIN_CFG, 0x0000_0002)?;
        }

        self.disable_wpdma()?;
        self.bus.write_firmware(data).map_err(|_| Rt2800Error::Bus)?;

        let attempts = self.config.busy_count;
        self.poll_reg(RegisterBank::Csr, PBF_SYS_CTRL, attempts, embassy_time::Duration::from_micros(1),
            |reg| PBF_SYS_CTRL_READY.is_set(reg))
            .inspect_err(|_| error!("PBF system register not ready"))?;

        // DMA comes back when the radio is enabled
        self.disable_wpdma()?;

        self.write_reg(H2M_BBP_AGENT, 0)?;
        self.write_reg(H2M_MAILBOX_CSR, 0)?;
        if self.chip.bus.is_usb() {
            self.write_reg(H2M_INT_SRC, 0)?;
            self.mcu_request(MCU_BOOT_SIGNAL, 0, 0, 0)?;
        }
        self.usleep(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_crc(len: usize) -> [u8; FIRMWARE_SIZE_SMALL] {
        let mut image = [0u8; FIRMWARE_SIZE_SMALL];
        let crc = crc_ccitt(0xffff, &image[..len - 2]);
        image[len - 2..len].copy_from_slice(&crc.to_le_bytes());
        image
    }

    #[test]
    fn crc_reference() {
        // CRC-16/MCRF4XX check value
        assert_eq!(crc_ccitt(0xffff, b"123456789"), 0x6f91);
    }

    #[test]
    fn zero_image_with_crc_passes() {
        let image = image_with_crc(FIRMWARE_SIZE_SMALL);
        assert!(firmware_crc_ok(&image));
    }

    #[test]
    fn flipped_byte_fails() {
        let mut image = image_with_crc(FIRMWARE_SIZE_SMALL);
        image[100] ^= 0x01;
        assert!(!firmware_crc_ok(&image));
        let mut image = image_with_crc(FIRMWARE_SIZE_SMALL);
        image[FIRMWARE_SIZE_SMALL - 3] ^= 0x80;
        assert!(!firmware_crc_ok(&image));
    }

    #[test]
    fn too_short() {
        assert!(!firmware_crc_ok(&[0x12]));
    }
}
