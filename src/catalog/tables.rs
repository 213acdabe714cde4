//! Built-in rule tables.
//!
//! `encoded` holds the base64 encoding of each regex source; see the
//! [module docs](super) for why. Severities are the ones the shell scanner
//! reports directly. The keyword scanner always reports Info and the payload
//! decoder re-grades hits by catalog, whatever the table says.

use super::RuleSpec;
use crate::finding::Severity;

pub(crate) static SHELL_DANGER_RULES: &[RuleSpec] = &[
    // Pipe to shell
    RuleSpec {
        id: "shell/pipe-curl-bash",
        severity: Severity::Critical,
        encoded: "Y3VybC4qXHxccypiYXNoXGI=",
        message: "Remote download piped straight into bash",
    },
    RuleSpec {
        id: "shell/pipe-wget-bash",
        severity: Severity::Critical,
        encoded: "d2dldC4qXHxccypiYXNoXGI=",
        message: "Remote download (wget) piped straight into bash",
    },
    RuleSpec {
        id: "shell/pipe-curl-sh",
        severity: Severity::Critical,
        encoded: "Y3VybC4qXHxccypzaFxi",
        message: "Remote download piped straight into sh",
    },
    RuleSpec {
        id: "shell/pipe-wget-sh",
        severity: Severity::Critical,
        encoded: "d2dldC4qXHxccypzaFxi",
        message: "Remote download (wget) piped straight into sh",
    },
    // Download then execute
    RuleSpec {
        id: "shell/download-exec-wget",
        severity: Severity::Critical,
        encoded: "d2dldFxzKy4qLU9ccytcUysuKiYmLipiYXNo",
        message: "Two-step download then execute via wget",
    },
    RuleSpec {
        id: "shell/download-exec-curl",
        severity: Severity::Critical,
        encoded: "Y3VybFxzKy4qLW9ccytcUysuKiYmLipiYXNo",
        message: "Two-step download then execute via curl",
    },
    // Destructive operations
    RuleSpec {
        id: "shell/rm-root",
        severity: Severity::Critical,
        encoded: "KD9tKVxicm1ccystKD86cmZ8ZnJ8UmZ8ZlJ8clJ8UnIpXHMrLyg/OlwqfFtccyInXHg2MDsmfCldfCQp",
        message: "Recursive deletion of the filesystem root",
    },
    RuleSpec {
        id: "shell/fork-bomb",
        severity: Severity::Critical,
        encoded: "OlwoXClccypce1xzKjpcfDomXHMqXH07Og==",
        message: "Fork bomb",
    },
    // Reverse shells and listeners
    RuleSpec {
        id: "shell/netcat-flags",
        severity: Severity::Warning,
        encoded: "KD9tKSg/Ol58XHx8XHMpbmNccyst",
        message: "Netcat invoked with flags, possible reverse shell or listener",
    },
    RuleSpec {
        id: "shell/netcat",
        severity: Severity::Warning,
        encoded: "KD9tKSg/Ol58XHx8XHMpbmV0Y2F0XHMr",
        message: "Netcat usage, possible reverse shell or listener",
    },
    RuleSpec {
        id: "shell/dev-tcp",
        severity: Severity::Warning,
        encoded: "L2Rldi90Y3Av",
        message: "Redirection through /dev/tcp, possible reverse shell",
    },
    // Privilege escalation
    RuleSpec {
        id: "shell/sudo",
        severity: Severity::Warning,
        encoded: "KD9tKSg/Ol58XHMpc3Vkb1xzKw==",
        message: "Privilege escalation through sudo",
    },
    RuleSpec {
        id: "shell/setuid",
        severity: Severity::Warning,
        encoded: "Y2htb2RccytbdWdvYV0qXCtzXGI=",
        message: "Setuid bit set with chmod",
    },
    // Shell eval
    RuleSpec {
        id: "shell/eval",
        severity: Severity::Warning,
        encoded: "KD9tKSg/Ol58XHMpZXZhbFxzKw==",
        message: "Dynamic shell evaluation (eval)",
    },
    // Startup-file persistence
    RuleSpec {
        id: "shell/persist-bashrc",
        severity: Severity::Warning,
        encoded: "Pj4/XHMqKD86fnxcJEhPTUV8XCRce0hPTUVcfSkvXC5iYXNocmM=",
        message: "Write to .bashrc, possible persistence",
    },
    RuleSpec {
        id: "shell/persist-zshrc",
        severity: Severity::Warning,
        encoded: "Pj4/XHMqKD86fnxcJEhPTUV8XCRce0hPTUVcfSkvXC56c2hyYw==",
        message: "Write to .zshrc, possible persistence",
    },
    RuleSpec {
        id: "shell/persist-profile",
        severity: Severity::Warning,
        encoded: "Pj4/XHMqKD86fnxcJEhPTUV8XCRce0hPTUVcfSkvXC4oPzpiYXNoXyk/cHJvZmlsZQ==",
        message: "Write to a login profile, possible persistence",
    },
    // Informational
    RuleSpec {
        id: "shell/exec",
        severity: Severity::Info,
        encoded: "KD9tKSg/Ol58XHMpZXhlY1xzKw==",
        message: "Process replaced with exec",
    },
    RuleSpec {
        id: "shell/export-env",
        severity: Severity::Info,
        encoded: "KD9tKSg/Ol58XHMpZXhwb3J0XHMrW0EtWl9dKz0=",
        message: "Environment variable exported",
    },
    RuleSpec {
        id: "shell/printenv",
        severity: Severity::Info,
        encoded: "XGJwcmludGVudlxi",
        message: "Environment dumped to standard output",
    },
    RuleSpec {
        id: "shell/env-dump",
        severity: Severity::Info,
        encoded: "XGJlbnZccypbPnxd",
        message: "Environment dumped to a file or pipe",
    },
];

pub(crate) static KEYWORD_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "keyword/eval-call",
        severity: Severity::Info,
        encoded: "XGJldmFsXCg=",
        message: "Dynamic evaluation with eval",
    },
    RuleSpec {
        id: "keyword/exec-call",
        severity: Severity::Info,
        encoded: "XGJleGVjXCg=",
        message: "Dynamic execution with exec",
    },
    RuleSpec {
        id: "keyword/subprocess",
        severity: Severity::Info,
        encoded: "XGJzdWJwcm9jZXNzXC4=",
        message: "Subprocess invocation",
    },
    RuleSpec {
        id: "keyword/os-system",
        severity: Severity::Info,
        encoded: "XGJvc1wuc3lzdGVtXCg=",
        message: "Shell command through os.system",
    },
    RuleSpec {
        id: "keyword/child-process",
        severity: Severity::Info,
        encoded: "XGJjaGlsZF9wcm9jZXNzXGI=",
        message: "Node.js child process spawning",
    },
    RuleSpec {
        id: "keyword/b64decode",
        severity: Severity::Info,
        encoded: "XGJiYXNlNjRcLmI2NGRlY29kZVxi",
        message: "Base64 decoding primitive",
    },
    RuleSpec {
        id: "keyword/codecs-decode",
        severity: Severity::Info,
        encoded: "XGJjb2RlY3NcLmRlY29kZVxi",
        message: "Codecs decoding primitive",
    },
    RuleSpec {
        id: "keyword/atob",
        severity: Severity::Info,
        encoded: "XGJhdG9iXCg=",
        message: "Base64 decoding with atob",
    },
    RuleSpec {
        id: "keyword/requests-get",
        severity: Severity::Info,
        encoded: "XGJyZXF1ZXN0c1wuZ2V0XCg=",
        message: "Outbound HTTP request",
    },
    RuleSpec {
        id: "keyword/urllib",
        severity: Severity::Info,
        encoded: "XGJ1cmxsaWJcLnJlcXVlc3RcYg==",
        message: "Outbound network request through urllib",
    },
    RuleSpec {
        id: "keyword/socket",
        severity: Severity::Info,
        encoded: "XGJzb2NrZXRcLg==",
        message: "Raw socket usage",
    },
];

pub(crate) static AI_THREAT_RULES: &[RuleSpec] = &[
    // Instruction override
    RuleSpec {
        id: "ai/ignore-instructions",
        severity: Severity::Warning,
        encoded: "aWdub3JlXHMrKD86YWxsXHMrKT8oPzpwcmV2aW91c3xwcmlvcnxhYm92ZSlccysoPzppbnN0cnVjdGlvbnM/fHByb21wdHM/fHJ1bGVzPyk=",
        message: "Prompt injection: instruction override phrasing",
    },
    RuleSpec {
        id: "ai/disregard-instructions",
        severity: Severity::Warning,
        encoded: "ZGlzcmVnYXJkXHMrKD86YWxsXHMrKT8oPzpwcmV2aW91c3xwcmlvcnxhYm92ZXx5b3VyKVxzKyg/Omluc3RydWN0aW9ucz98cHJvbXB0cz98cnVsZXM/fGd1aWRlbGluZXM/KQ==",
        message: "Prompt injection: disregard-instructions phrasing",
    },
    RuleSpec {
        id: "ai/reveal-system-prompt",
        severity: Severity::Warning,
        encoded: "KD86cmV2ZWFsfHByaW50fHNob3d8cmVwZWF0fG91dHB1dClccysoPzp5b3VyXHMrKT8oPzpzeXN0ZW1ccytwcm9tcHR8aW5pdGlhbFxzK2luc3RydWN0aW9ucz8p",
        message: "Prompt injection: system prompt extraction",
    },
    // Jailbreak role-play
    RuleSpec {
        id: "ai/jailbreak-dan",
        severity: Severity::Warning,
        encoded: "XGIoPzpEQU58ZG9ccythbnl0aGluZ1xzK25vdylccyttb2RlXGI=",
        message: "Jailbreak: DAN persona",
    },
    RuleSpec {
        id: "ai/jailbreak-developer-mode",
        severity: Severity::Warning,
        encoded: "ZGV2ZWxvcGVyXHMrbW9kZVxzKyg/OmVuYWJsZWQ/fGFjdGl2YXRlZD98b24pXGI=",
        message: "Jailbreak: developer mode activation",
    },
    RuleSpec {
        id: "ai/jailbreak-roleplay",
        severity: Severity::Warning,
        encoded: "KD86cHJldGVuZHxhY3Rccythc1xzK2lmfGltYWdpbmUpXHMrKD86dGhhdFxzKyk/eW91XHMrKD86YXJlfGhhdmUpXHMrKD86bm9ccysoPzpyZXN0cmljdGlvbnN8bGltaXRzfHJ1bGVzfGZpbHRlcnMpfGFuP1xzKyg/OnVucmVzdHJpY3RlZHx1bmZpbHRlcmVkfHVuY2Vuc29yZWR8ZXZpbCkp",
        message: "Jailbreak: unrestricted role-play",
    },
    // Malicious artifact requests
    RuleSpec {
        id: "ai/malicious-artifact",
        severity: Severity::Warning,
        encoded: "KD86d3JpdGV8Y3JlYXRlfGdlbmVyYXRlfGJ1aWxkfGNvZGUpXHMrKD86bWVccyspPyg/OmFccyt8YW5ccyt8c29tZVxzKyk/KD86bWFsd2FyZXxrZXlsb2dnZXJ8cmFuc29td2FyZXx2aXJ1c3x0cm9qYW58cm9vdGtpdHxiYWNrZG9vcik=",
        message: "Request to produce malicious software",
    },
    RuleSpec {
        id: "ai/filter-bypass",
        severity: Severity::Warning,
        encoded: "YnlwYXNzXHMrKD86dGhlXHMrfGFueVxzK3xhbGxccyspPyg/OnNhZmV0eXxzZWN1cml0eXxjb250ZW50KVxzKyg/OmZpbHRlcnM/fGNoZWNrcz98cmVzdHJpY3Rpb25zP3xndWFyZHJhaWxzPyk=",
        message: "Request to bypass safety filters",
    },
];

pub(crate) static PII_RULES: &[RuleSpec] = &[
    // Provider credentials
    RuleSpec {
        id: "pii/anthropic-key",
        severity: Severity::Warning,
        encoded: "XGJzay1hbnQtW0EtWmEtejAtOV8tXXsyMCx9",
        message: "Anthropic API key",
    },
    RuleSpec {
        id: "pii/openai-key",
        severity: Severity::Warning,
        encoded: "XGJzay0oPzpwcm9qLSk/W0EtWmEtejAtOV17MjAsfQ==",
        message: "OpenAI-style API key",
    },
    RuleSpec {
        id: "pii/aws-access-key",
        severity: Severity::Warning,
        encoded: "XGJBS0lBWzAtOUEtWl17MTZ9XGI=",
        message: "AWS access key id",
    },
    RuleSpec {
        id: "pii/github-token",
        severity: Severity::Warning,
        encoded: "XGJnaFtwb3Vzcl1fW0EtWmEtejAtOV17MzZ9XGI=",
        message: "GitHub token",
    },
    RuleSpec {
        id: "pii/bearer-token",
        severity: Severity::Warning,
        encoded: "XGJbQmJdZWFyZXJccytbQS1aYS16MC05XC0uX34rL117MjAsfT0q",
        message: "Bearer token",
    },
    // Personal data
    RuleSpec {
        id: "pii/ssn",
        severity: Severity::Warning,
        encoded: "XGJcZHszfS1cZHsyfS1cZHs0fVxi",
        message: "SSN-shaped number",
    },
    RuleSpec {
        id: "pii/email",
        severity: Severity::Warning,
        encoded: "XGJbQS1aYS16MC05Ll8lKy1dK0BbQS1aYS16MC05Li1dK1wuW0EtWmEtel17Mix9XGI=",
        message: "E-mail address",
    },
    RuleSpec {
        id: "pii/ipv4",
        severity: Severity::Warning,
        encoded: "XGIoPzooPzoyNVswLTVdfDJbMC00XVxkfDE/XGQ/XGQpXC4pezN9KD86MjVbMC01XXwyWzAtNF1cZHwxP1xkP1xkKVxi",
        message: "IPv4 address",
    },
];
