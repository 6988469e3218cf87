//! SMB2 wire format
//!
//! Just enough of the protocol to authenticate: NEGOTIATE, SESSION_SETUP
//! and TREE_CONNECT requests over the direct-TCP transport (4-byte NetBIOS
//! framing), plus response parsing for the fields the validator needs
//! (status, session id, security buffer). Dialects 2.0.2 and 2.1 keep the
//! exchange free of the 3.x preauth integrity ceremony.

use crate::validation::results::Outcome;

pub const HEADER_LEN: usize = 64;
const PROTOCOL_ID: [u8; 4] = [0xfe, b'S', b'M', b'B'];

pub const CMD_NEGOTIATE: u16 = 0x0000;
pub const CMD_SESSION_SETUP: u16 = 0x0001;
pub const CMD_TREE_CONNECT: u16 = 0x0003;

pub const STATUS_SUCCESS: u32 = 0x0000_0000;
pub const STATUS_MORE_PROCESSING_REQUIRED: u32 = 0xc000_0016;
pub const STATUS_LOGON_FAILURE: u32 = 0xc000_006d;
pub const STATUS_ACCOUNT_RESTRICTION: u32 = 0xc000_006e;
pub const STATUS_PASSWORD_EXPIRED: u32 = 0xc000_0071;
pub const STATUS_ACCOUNT_DISABLED: u32 = 0xc000_0072;
pub const STATUS_ACCOUNT_LOCKED_OUT: u32 = 0xc000_0234;
pub const STATUS_ACCESS_DENIED: u32 = 0xc000_0022;
pub const STATUS_BAD_NETWORK_NAME: u32 = 0xc000_00cc;

/// Map an SMB session-setup status onto the outcome taxonomy
pub fn classify_status(status: u32) -> (Outcome, String) {
    match status {
        STATUS_SUCCESS => (Outcome::Success, "Success".to_string()),
        STATUS_LOGON_FAILURE | STATUS_ACCESS_DENIED => (
            Outcome::AuthFailed,
            "Authentication failed (wrong credentials)".to_string(),
        ),
        STATUS_ACCOUNT_RESTRICTION => (
            Outcome::AuthFailed,
            "Authentication failed (account restriction)".to_string(),
        ),
        STATUS_PASSWORD_EXPIRED => (
            Outcome::AuthFailed,
            "Authentication failed (password expired)".to_string(),
        ),
        STATUS_ACCOUNT_DISABLED => (
            Outcome::AuthFailed,
            "Authentication failed (account disabled)".to_string(),
        ),
        STATUS_ACCOUNT_LOCKED_OUT => (
            Outcome::AuthFailed,
            "Authentication failed (account locked out)".to_string(),
        ),
        other => (
            Outcome::UnknownError,
            format!("SMB error: NT status 0x{:08x}", other),
        ),
    }
}

/// Fixed header for one request
fn header(command: u16, message_id: u64, session_id: u64, tree_id: u32) -> Vec<u8> {
    let mut hdr = Vec::with_capacity(HEADER_LEN);
    hdr.extend_from_slice(&PROTOCOL_ID);
    hdr.extend_from_slice(&64u16.to_le_bytes()); // StructureSize
    hdr.extend_from_slice(&0u16.to_le_bytes()); // CreditCharge
    hdr.extend_from_slice(&0u32.to_le_bytes()); // Status / ChannelSequence
    hdr.extend_from_slice(&command.to_le_bytes());
    hdr.extend_from_slice(&1u16.to_le_bytes()); // CreditRequest
    hdr.extend_from_slice(&0u32.to_le_bytes()); // Flags
    hdr.extend_from_slice(&0u32.to_le_bytes()); // NextCommand
    hdr.extend_from_slice(&message_id.to_le_bytes());
    hdr.extend_from_slice(&0u32.to_le_bytes()); // Reserved
    hdr.extend_from_slice(&tree_id.to_le_bytes());
    hdr.extend_from_slice(&session_id.to_le_bytes());
    hdr.extend_from_slice(&[0u8; 16]); // Signature
    hdr
}

/// NEGOTIATE request offering dialects 2.0.2 and 2.1
pub fn negotiate_request(message_id: u64, client_guid: [u8; 16]) -> Vec<u8> {
    let mut msg = header(CMD_NEGOTIATE, message_id, 0, 0);
    msg.extend_from_slice(&36u16.to_le_bytes()); // StructureSize
    msg.extend_from_slice(&2u16.to_le_bytes()); // DialectCount
    msg.extend_from_slice(&1u16.to_le_bytes()); // SecurityMode: signing enabled
    msg.extend_from_slice(&0u16.to_le_bytes()); // Reserved
    msg.extend_from_slice(&0u32.to_le_bytes()); // Capabilities
    msg.extend_from_slice(&client_guid);
    msg.extend_from_slice(&0u64.to_le_bytes()); // ClientStartTime
    msg.extend_from_slice(&0x0202u16.to_le_bytes());
    msg.extend_from_slice(&0x0210u16.to_le_bytes());
    msg
}

/// SESSION_SETUP request carrying one NTLMSSP token
pub fn session_setup_request(message_id: u64, session_id: u64, token: &[u8]) -> Vec<u8> {
    let mut msg = header(CMD_SESSION_SETUP, message_id, session_id, 0);
    msg.extend_from_slice(&25u16.to_le_bytes()); // StructureSize
    msg.push(0); // Flags
    msg.push(1); // SecurityMode: signing enabled
    msg.extend_from_slice(&0u32.to_le_bytes()); // Capabilities
    msg.extend_from_slice(&0u32.to_le_bytes()); // Channel
    msg.extend_from_slice(&((HEADER_LEN + 24) as u16).to_le_bytes()); // SecurityBufferOffset
    msg.extend_from_slice(&(token.len() as u16).to_le_bytes());
    msg.extend_from_slice(&0u64.to_le_bytes()); // PreviousSessionId
    msg.extend_from_slice(token);
    msg
}

/// TREE_CONNECT request for a UNC path like `\\host\IPC$`
pub fn tree_connect_request(message_id: u64, session_id: u64, unc_path: &str) -> Vec<u8> {
    let path: Vec<u8> = unc_path
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    let mut msg = header(CMD_TREE_CONNECT, message_id, session_id, 0);
    msg.extend_from_slice(&9u16.to_le_bytes()); // StructureSize
    msg.extend_from_slice(&0u16.to_le_bytes()); // Reserved
    msg.extend_from_slice(&((HEADER_LEN + 8) as u16).to_le_bytes()); // PathOffset
    msg.extend_from_slice(&(path.len() as u16).to_le_bytes());
    msg.extend_from_slice(&path);
    msg
}

/// Prepend the 4-byte direct-TCP transport header
pub fn frame(message: &[u8]) -> Vec<u8> {
    let len = message.len() as u32;
    let mut framed = Vec::with_capacity(4 + message.len());
    framed.push(0);
    framed.extend_from_slice(&len.to_be_bytes()[1..]);
    framed.extend_from_slice(message);
    framed
}

/// The response fields the validator cares about
#[derive(Debug)]
pub struct Response {
    pub command: u16,
    pub status: u32,
    pub session_id: u64,
    pub security_token: Vec<u8>,
}

/// Parse one response message (transport header already stripped)
pub fn parse_response(message: &[u8]) -> Result<Response, String> {
    if message.len() < HEADER_LEN || message[..4] != PROTOCOL_ID {
        return Err("Malformed SMB2 response".to_string());
    }
    let status = u32::from_le_bytes(message[8..12].try_into().unwrap());
    let command = u16::from_le_bytes(message[12..14].try_into().unwrap());
    let session_id = u64::from_le_bytes(message[40..48].try_into().unwrap());

    let mut security_token = Vec::new();
    if command == CMD_SESSION_SETUP && message.len() >= HEADER_LEN + 8 {
        let body = &message[HEADER_LEN..];
        let offset = u16::from_le_bytes(body[4..6].try_into().unwrap()) as usize;
        let len = u16::from_le_bytes(body[6..8].try_into().unwrap()) as usize;
        if len > 0 {
            if offset + len > message.len() {
                return Err("SMB2 security buffer out of bounds".to_string());
            }
            security_token = message[offset..offset + len].to_vec();
        }
    }

    Ok(Response {
        command,
        status,
        session_id,
        security_token,
    })
}
