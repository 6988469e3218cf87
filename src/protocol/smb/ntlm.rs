//! NTLMSSP messages and NTLMv2 computation
//!
//! Raw NTLMSSP tokens carried inside SMB2 SESSION_SETUP: a NEGOTIATE
//! message out, the server's CHALLENGE back, then an AUTHENTICATE message
//! holding the NTLMv2 response. Crypto per MS-NLMP 3.3.2: the NT hash is
//! MD4 over the UTF-16LE password, NTOWFv2 and the proof string are
//! HMAC-MD5 chains over it.

use hmac::{Hmac, Mac};
use md4::{Digest, Md4};
use md5::Md5;

type HmacMd5 = Hmac<Md5>;

const SIGNATURE: &[u8; 8] = b"NTLMSSP\0";
const MSG_NEGOTIATE: u32 = 1;
const MSG_CHALLENGE: u32 = 2;
const MSG_AUTHENTICATE: u32 = 3;

const NEGOTIATE_UNICODE: u32 = 0x0000_0001;
const REQUEST_TARGET: u32 = 0x0000_0004;
const NEGOTIATE_NTLM: u32 = 0x0000_0200;
const NEGOTIATE_ALWAYS_SIGN: u32 = 0x0000_8000;
const NEGOTIATE_EXTENDED_SESSIONSECURITY: u32 = 0x0008_0000;
const NEGOTIATE_TARGET_INFO: u32 = 0x0080_0000;

const NEGOTIATE_FLAGS: u32 = NEGOTIATE_UNICODE
    | REQUEST_TARGET
    | NEGOTIATE_NTLM
    | NEGOTIATE_ALWAYS_SIGN
    | NEGOTIATE_EXTENDED_SESSIONSECURITY
    | NEGOTIATE_TARGET_INFO;

/// Seconds between the Windows epoch (1601) and the Unix epoch (1970)
const EPOCH_DELTA_SECS: u64 = 11_644_473_600;

pub fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// MD4 over the UTF-16LE password (the NT hash)
pub fn nt_hash(password: &str) -> [u8; 16] {
    let mut md4 = Md4::new();
    md4.update(utf16le(password));
    md4.finalize().into()
}

fn hmac_md5(key: &[u8], data: &[u8]) -> [u8; 16] {
    let mut mac = HmacMd5::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// NTOWFv2: HMAC-MD5 keyed with the NT hash over UPPER(user) + domain
pub fn ntowf_v2(username: &str, domain: &str, password: &str) -> [u8; 16] {
    let identity = utf16le(&format!("{}{}", username.to_uppercase(), domain));
    hmac_md5(&nt_hash(password), &identity)
}

/// Current time as a Windows FILETIME (100ns ticks since 1601)
pub fn filetime_now() -> u64 {
    let unix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    (unix.as_secs() + EPOCH_DELTA_SECS) * 10_000_000 + u64::from(unix.subsec_nanos()) / 100
}

/// NTProofStr + temp blob, the NtChallengeResponse payload
pub fn ntlmv2_response(
    ntowf: &[u8; 16],
    server_challenge: &[u8; 8],
    client_challenge: &[u8; 8],
    timestamp: u64,
    target_info: &[u8],
) -> Vec<u8> {
    let mut temp = Vec::with_capacity(28 + target_info.len() + 4);
    temp.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    temp.extend_from_slice(&timestamp.to_le_bytes());
    temp.extend_from_slice(client_challenge);
    temp.extend_from_slice(&[0x00; 4]);
    temp.extend_from_slice(target_info);
    temp.extend_from_slice(&[0x00; 4]);

    let mut keyed = Vec::with_capacity(8 + temp.len());
    keyed.extend_from_slice(server_challenge);
    keyed.extend_from_slice(&temp);
    let proof = hmac_md5(ntowf, &keyed);

    let mut response = Vec::with_capacity(16 + temp.len());
    response.extend_from_slice(&proof);
    response.extend_from_slice(&temp);
    response
}

/// The type 1 message opening the exchange
pub fn negotiate_message() -> Vec<u8> {
    let mut msg = Vec::with_capacity(32);
    msg.extend_from_slice(SIGNATURE);
    msg.extend_from_slice(&MSG_NEGOTIATE.to_le_bytes());
    msg.extend_from_slice(&NEGOTIATE_FLAGS.to_le_bytes());
    // Empty domain and workstation fields (len, maxlen, offset)
    msg.extend_from_slice(&[0u8; 8]);
    msg.extend_from_slice(&[0u8; 8]);
    msg
}

/// Parsed type 2 challenge
#[derive(Debug)]
pub struct Challenge {
    pub server_challenge: [u8; 8],
    pub target_info: Vec<u8>,
}

/// Parse the server's type 2 message
pub fn parse_challenge(token: &[u8]) -> Result<Challenge, String> {
    if token.len() < 48 || &token[..8] != SIGNATURE {
        return Err("Malformed NTLM challenge token".to_string());
    }
    let msg_type = u32::from_le_bytes(token[8..12].try_into().unwrap());
    if msg_type != MSG_CHALLENGE {
        return Err(format!("Unexpected NTLM message type {}", msg_type));
    }

    let mut server_challenge = [0u8; 8];
    server_challenge.copy_from_slice(&token[24..32]);

    let info_len = u16::from_le_bytes(token[40..42].try_into().unwrap()) as usize;
    let info_offset = u32::from_le_bytes(token[44..48].try_into().unwrap()) as usize;
    if info_offset + info_len > token.len() {
        return Err("NTLM target info out of bounds".to_string());
    }
    let target_info = token[info_offset..info_offset + info_len].to_vec();

    Ok(Challenge {
        server_challenge,
        target_info,
    })
}

/// Build the type 3 message answering `challenge`
pub fn authenticate_message(
    username: &str,
    domain: &str,
    workstation: &str,
    password: &str,
    challenge: &Challenge,
    client_challenge: &[u8; 8],
    timestamp: u64,
) -> Vec<u8> {
    let ntowf = ntowf_v2(username, domain, password);
    let nt_response = ntlmv2_response(
        &ntowf,
        &challenge.server_challenge,
        client_challenge,
        timestamp,
        &challenge.target_info,
    );

    let domain_bytes = utf16le(domain);
    let user_bytes = utf16le(username);
    let workstation_bytes = utf16le(workstation);

    // Fixed part is 64 bytes: signature, type, six field descriptors, flags
    let mut offset: u32 = 64;
    let mut fields = Vec::with_capacity(48);
    let mut payload = Vec::new();
    let mut push_field = |data: &[u8], fields: &mut Vec<u8>, payload: &mut Vec<u8>| {
        let len = data.len() as u16;
        fields.extend_from_slice(&len.to_le_bytes());
        fields.extend_from_slice(&len.to_le_bytes());
        fields.extend_from_slice(&offset.to_le_bytes());
        payload.extend_from_slice(data);
        offset += u32::from(len);
    };

    // Order per MS-NLMP: LM response, NT response, domain, user,
    // workstation, session key (empty: no signing or sealing)
    push_field(&[], &mut fields, &mut payload);
    push_field(&nt_response, &mut fields, &mut payload);
    push_field(&domain_bytes, &mut fields, &mut payload);
    push_field(&user_bytes, &mut fields, &mut payload);
    push_field(&workstation_bytes, &mut fields, &mut payload);
    push_field(&[], &mut fields, &mut payload);

    let mut msg = Vec::with_capacity(64 + payload.len());
    msg.extend_from_slice(SIGNATURE);
    msg.extend_from_slice(&MSG_AUTHENTICATE.to_le_bytes());
    msg.extend_from_slice(&fields);
    msg.extend_from_slice(&NEGOTIATE_FLAGS.to_le_bytes());
    msg.extend_from_slice(&payload);
    msg
}
