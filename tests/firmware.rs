mod common;

use common::{open, FakeBus};
use rt2800::firmware::{crc_ccitt, FIRMWARE_SIZE_SMALL};
use rt2800::regs::mac::{AUTOWAKEUP_CFG, FIRMWARE_IMAGE_BASE, MCU_BOOT_SIGNAL};
use rt2800::{BusKind, Rt2800Error};

fn image(len: usize) -> Vec<u8> {
    let mut data: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
    let crc = crc_ccitt(0xffff, &data[..len - 2]);
    data[len - 2..].copy_from_slice(&crc.to_le_bytes());
    data
}

#[test]
fn load_on_rt3070() {
    let mut dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    dev.bus_mut().clear_logs();
    let fw = image(FIRMWARE_SIZE_SMALL);

    dev.load_firmware(&fw).expect("load_firmware");

    let bus = dev.bus_mut();
    assert_eq!(bus.writes.first(), Some(&(AUTOWAKEUP_CFG, 0)));
    assert_eq!(bus.reg(FIRMWARE_IMAGE_BASE), u32::from_le_bytes([fw[0], fw[1], fw[2], fw[3]]));
    let last = FIRMWARE_IMAGE_BASE + FIRMWARE_SIZE_SMALL as u32 - 4;
    assert_eq!(bus.reg(last), u32::from_le_bytes([fw[4092], fw[4093], fw[4094], fw[4095]]));
    assert_eq!(bus.mcu_commands.last().map(|c| c.command), Some(MCU_BOOT_SIGNAL));
}

#[test]
fn bad_length_rejected() {
    let mut dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    dev.bus_mut().clear_logs();
    assert_eq!(dev.load_firmware(&image(5000)), Err(Rt2800Error::FirmwareBadLength(5000)));
    assert!(dev.bus_mut().writes.is_empty());
}

#[test]
fn corrupted_image_rejected() {
    let mut dev = open(FakeBus::new(BusKind::Usb, 0x3070, 0x0201));
    let mut fw = image(FIRMWARE_SIZE_SMALL);
    fw[10] ^= 0x40;
    assert_eq!(dev.load_firmware(&fw), Err(Rt2800Error::FirmwareBadCrc { chunk: 0 }));
}

#[test]
fn single_image_rejected_on_rt3572() {
    let dev = open(FakeBus::new(BusKind::Usb, 0x3572, 0x0201));
    assert_eq!(dev.check_firmware(&image(FIRMWARE_SIZE_SMALL)), Err(Rt2800Error::FirmwareBadVersion));
    let mut bundle = image(FIRMWARE_SIZE_SMALL);
    bundle.extend(image(FIRMWARE_SIZE_SMALL));
    assert_eq!(dev.check_firmware(&bundle), Ok(()));
}
