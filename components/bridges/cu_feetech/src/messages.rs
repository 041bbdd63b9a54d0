//! Feetech bus packets.
//!
//! Every packet is `FF FF <id> <len> <instr> <params…> <checksum>` where
//! `len = params + 2` and the checksum is the inverted byte sum of
//! everything after the header. Multi-byte registers are little-endian
//! (STS series).

use std::io;

const HEADER: [u8; 2] = [0xFF, 0xFF];

/// Addresses every servo on the bus. Broadcast packets get no reply.
pub const BROADCAST_ID: u8 = 0xFE;

pub const INSTR_READ: u8 = 0x02;
pub const INSTR_SYNC_WRITE: u8 = 0x83;

/// Goal position register (2 bytes).
pub const GOAL_POSITION: u8 = 42;
/// Present position register (2 bytes).
pub const PRESENT_POSITION: u8 = 56;

/// Maximum number of servos supported on a single bus.
///
/// Feetech IDs go up to 253, but real arms (SO-100 / SO-101) have 6
/// joints.  We cap at 8 to keep the payload small.
pub const MAX_SERVOS: usize = 8;

pub fn checksum(data: &[u8]) -> u8 {
    let mut s: u8 = 0;
    for &b in data {
        s = s.wrapping_add(b);
    }
    !s
}

pub fn encode_packet(id: u8, instr: u8, params: &[u8]) -> Vec<u8> {
    let length = (params.len() + 2) as u8;
    let mut pkt = Vec::with_capacity(6 + params.len());
    pkt.extend_from_slice(&HEADER);
    pkt.push(id);
    pkt.push(length);
    pkt.push(instr);
    pkt.extend_from_slice(params);
    pkt.push(checksum(&pkt[2..]));
    pkt
}

/// One broadcast packet moving every listed servo to its goal tick at once.
pub fn sync_write_goals(goals: &[(u8, u16)]) -> Vec<u8> {
    debug_assert!(goals.len() <= MAX_SERVOS);
    let mut params = Vec::with_capacity(2 + goals.len() * 3);
    params.push(GOAL_POSITION);
    params.push(2);
    for &(id, ticks) in goals {
        params.push(id);
        params.extend_from_slice(&ticks.to_le_bytes());
    }
    encode_packet(BROADCAST_ID, INSTR_SYNC_WRITE, &params)
}

pub fn read_position_request(id: u8) -> Vec<u8> {
    encode_packet(id, INSTR_READ, &[PRESENT_POSITION, 2])
}

/// Reads a status packet and returns its parameters.
pub fn read_response<R: io::Read>(port: &mut R) -> io::Result<Vec<u8>> {
    let mut hdr = [0u8; 4];
    port.read_exact(&mut hdr)?;
    if hdr[..2] != HEADER {
        return Err(io::Error::other("bad header"));
    }
    let len = hdr[3] as usize;
    if len < 2 {
        return Err(io::Error::other("short packet"));
    }
    // error byte, params, checksum
    let mut rest = vec![0u8; len];
    port.read_exact(&mut rest)?;
    let expected = checksum(&[&hdr[2..], &rest[..len - 1]].concat());
    if rest[len - 1] != expected {
        return Err(io::Error::other("bad checksum"));
    }
    Ok(rest[1..len - 1].to_vec())
}

pub fn read_position<P: io::Read + io::Write>(port: &mut P, id: u8) -> io::Result<u16> {
    port.write_all(&read_position_request(id))?;
    port.flush()?;
    let data = read_response(port)?;
    if data.len() < 2 {
        return Err(io::Error::other("short response"));
    }
    Ok(u16::from_le_bytes([data[0], data[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_request_matches_the_datasheet() {
        // Read 2 bytes at 0x38 from servo 1.
        assert_eq!(read_position_request(1), [0xFF, 0xFF, 0x01, 0x04, 0x02, 0x38, 0x02, 0xBE]);
    }

    #[test]
    fn sync_write_layout() {
        let pkt = sync_write_goals(&[(1, 0x0800), (2, 0x0400)]);
        assert_eq!(
            pkt,
            [0xFF, 0xFF, 0xFE, 0x0A, 0x83, 42, 2, 1, 0x00, 0x08, 2, 0x00, 0x04, checksum(&pkt[2..pkt.len() - 1])]
        );
        assert_eq!(pkt[3] as usize, pkt.len() - 4);
    }

    #[test]
    fn parses_a_position_reply() {
        let mut reply = vec![0xFF, 0xFF, 0x01, 0x04, 0x00, 0x00, 0x08];
        reply.push(checksum(&reply[2..]));
        assert_eq!(read_response(&mut Cursor::new(reply)).unwrap(), [0x00, 0x08]);
    }

    #[test]
    fn rejects_a_corrupt_reply() {
        let reply = vec![0xFF, 0xFF, 0x01, 0x04, 0x00, 0x00, 0x08, 0x00];
        assert!(read_response(&mut Cursor::new(reply)).is_err());
        let reply = vec![0xFF, 0x00, 0x01, 0x04, 0x00, 0x00, 0x08, 0x00];
        assert!(read_response(&mut Cursor::new(reply)).is_err());
    }
}
