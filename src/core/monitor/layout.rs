/// Arquivo: core/monitor/layout.rs
///
/// Propósito: Fatos sobre a imagem do kernel mostrados pelo `kerninfo`.
///
/// Detalhes de Implementação:
/// - Endereços virtuais no higher-half; físico = virtual - `KERNBASE`.
/// - `_start` é o ponto de entrada físico do bootloader; os demais símbolos
///   vêm do linker script (`entry`, `etext`, `edata`, `end`).
use core::fmt;

/// Base do mapeamento higher-half do kernel.
pub const KERNBASE: usize = 0xFFFF_FFFF_8000_0000;

/// Limites da imagem do kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KernelLayout {
    /// Endereço físico de `_start`.
    pub start: usize,
    /// Endereços virtuais.
    pub entry: usize,
    pub etext: usize,
    pub edata: usize,
    pub end: usize,
}

impl KernelLayout {
    /// Lê os símbolos do linker script.
    #[cfg(target_os = "none")]
    pub fn from_linker() -> Self {
        extern "C" {
            static _start: u8;
            static entry: u8;
            static etext: u8;
            static edata: u8;
            static end: u8;
        }
        // SAFETY: só os endereços dos símbolos são usados; nunca são lidos
        unsafe {
            Self {
                start: core::ptr::addr_of!(_start) as usize,
                entry: core::ptr::addr_of!(entry) as usize,
                etext: core::ptr::addr_of!(etext) as usize,
                edata: core::ptr::addr_of!(edata) as usize,
                end: core::ptr::addr_of!(end) as usize,
            }
        }
    }

    /// Endereço físico de um endereço virtual do kernel.
    pub const fn phys(virt: usize) -> usize {
        virt.wrapping_sub(KERNBASE)
    }

    /// Tamanho da imagem em KB, arredondado para cima.
    ///
    /// Sem overflow para qualquer par `entry`/`end`.
    pub const fn footprint_kb(&self) -> usize {
        self.end.saturating_sub(self.entry).div_ceil(1024)
    }
}

impl fmt::Display for KernelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Special kernel symbols:")?;
        writeln!(f, "  _start                    {:016x} (phys)", self.start)?;
        let symbols = [
            ("entry", self.entry),
            ("etext", self.etext),
            ("edata", self.edata),
            ("end  ", self.end),
        ];
        for (name, virt) in symbols {
            writeln!(
                f,
                "  {}  {:016x} (virt)  {:016x} (phys)",
                name,
                virt,
                Self::phys(virt)
            )?;
        }
        writeln!(
            f,
            "Kernel executable memory footprint: {}KB",
            self.footprint_kb()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(entry: usize, end: usize) -> KernelLayout {
        KernelLayout {
            start: 0x10_0000,
            entry,
            etext: entry + 0x100,
            edata: entry + 0x200,
            end,
        }
    }

    #[test]
    fn footprint_rounds_up_to_kilobytes() {
        let base = KERNBASE + 0x10_0000;
        assert_eq!(layout(base, base).footprint_kb(), 0);
        assert_eq!(layout(base, base + 1).footprint_kb(), 1);
        assert_eq!(layout(base, base + 1024).footprint_kb(), 1);
        assert_eq!(layout(base, base + 1025).footprint_kb(), 2);
        assert_eq!(layout(base, base + 0x1_2345).footprint_kb(), 73);
    }

    #[test]
    fn footprint_of_huge_image_does_not_overflow() {
        assert_eq!(layout(0, usize::MAX).footprint_kb(), 1 << 54);
        assert_eq!(layout(0, KERNBASE + 0x11_0801).footprint_kb(), (KERNBASE >> 10) + 0x443);

        let inverted = KernelLayout {
            entry: usize::MAX,
            ..KernelLayout::default()
        };
        assert_eq!(inverted.footprint_kb(), 0);
    }

    #[test]
    fn empty_layout_has_no_footprint() {
        assert_eq!(KernelLayout::default().footprint_kb(), 0);
    }

    #[test]
    fn physical_address_drops_kernbase() {
        assert_eq!(KernelLayout::phys(KERNBASE + 0x10_000c), 0x10_000c);
    }

    #[test]
    fn display_lists_symbols_and_footprint() {
        let base = KERNBASE + 0x10_0000;
        let text = layout(base, base + 0x2000).to_string();
        assert!(text.starts_with("Special kernel symbols:\n"));
        assert!(text.contains("  entry  ffffffff80100000 (virt)  0000000000100000 (phys)\n"));
        assert!(text.contains("  end    ffffffff80102000 (virt)  0000000000102000 (phys)\n"));
        assert!(text.ends_with("Kernel executable memory footprint: 8KB\n"));
    }
}
