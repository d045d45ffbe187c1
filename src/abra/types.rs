use serde::{Deserialize, Serialize};

use super::record::abra_record;

abra_record! {
    /// Scalar fields of one `faktura-vydana`.
    pub struct InvoiceHeader {
        kod: Text = "kod",
        last_update: Date = "lastUpdate",
        dat_vyst: Date = "datVyst",
        duzp_puv: Date = "duzpPuv",
        duzp_ucto: Date = "duzpUcto",
        dat_splat: Date = "datSplat",
        dat_uhra: Date = "datUhr",
        dat_termin: Date = "datTermin",
        dat_real: Date = "datReal",
        dat_sazby_dph: Date = "datSazbyDph",
        popis: Text = "popis",
        poznam: Text = "poznam",
        uvod_txt: Text = "uvodTxt",
        zav_txt: Text = "zavTxt",
        sum_osv: Float = "sumOsv",
        sum_zkl_sniz: Float = "sumZklSniz",
        sum_zkl_sniz2: Float = "sumZklSniz2",
        sum_zkl_zakl: Float = "sumZklZakl",
        sum_zkl_celkem: Float = "sumZklCelkem",
        sum_dph_sniz: Float = "sumDphSniz",
        sum_dph_sniz2: Float = "sumDphSniz2",
        sum_dph_zakl: Float = "sumDphZakl",
        sum_dph_celkem: Float = "sumDphCelkem",
        sum_celk_sniz: Float = "sumCelkSniz",
        sum_celk_sniz2: Float = "sumCelkSniz2",
        sum_celk_zakl: Float = "sumCelkZakl",
        sum_celkem: Float = "sumCelkem",
        sum_osv_men: Float = "sumOsvMen",
        sum_zkl_sniz_men: Float = "sumZklSnizMen",
        sum_zkl_sniz2_men: Float = "sumZklSniz2Men",
        sum_zkl_zakl_men: Float = "sumZklZaklMen",
        sum_zkl_celkem_men: Float = "sumZklCelkemMen",
        sum_dph_zakl_men: Float = "sumDphZaklMen",
        sum_dph_sniz_men: Float = "sumDphSnizMen",
        sum_dph_sniz2_men: Float = "sumDphSniz2Men",
        sum_dph_celkem_men: Float = "sumDphCelkemMen",
        sum_celk_sniz_men: Float = "sumCelkSnizMen",
        sum_celk_sniz2_men: Float = "sumCelkSniz2Men",
        sum_celk_zakl_men: Float = "sumCelkZaklMen",
        sum_celkem_men: Float = "sumCelkemMen",
        sum_naklady: Float = "sumNaklady",
        sleva_dokl: Float = "slevaDokl",
        kurz: Float = "kurz",
        kurz_mnozstvi: Float = "kurzMnozstvi",
        stav_uziv_k: Text = "stavUzivK",
        naz_firmy: Text = "nazFirmy",
        ulice: Text = "ulice",
        mesto: Text = "mesto",
        psc: Text = "psc",
        ean_kod: Text = "eanKod",
        ic: Text = "ic",
        dic: Text = "dic",
        pocet_priloh: Float = "pocetPriloh",
        postovni_shodna: Bool = "postovniShodna",
        fa_nazev: Text = "faNazev",
        fa_nazev2: Text = "faNazev2",
        fa_ulice: Text = "faUlice",
        fa_mesto: Text = "faMesto",
        fa_psc: Text = "faPsc",
        fa_ean_kod: Text = "faEanKod",
        buc: Text = "buc",
        iban: Text = "iban",
        bic: Text = "bic",
        spec_sym: Text = "specSym",
        bez_polozek: Bool = "bezPolozek",
        ucetni: Bool = "ucetni",
        szb_dph_sniz: Float = "szbDphSniz",
        szb_dph_sniz2: Float = "szbDphSniz2",
        szb_dph_zakl: Float = "szbDphZakl",
        uzp_tuzemsko: Bool = "uzpTuzemsko",
        zuctovano: Bool = "zuctovano",
        dat_ucto: Date = "datUcto",
        vyloucit_saldo: Bool = "vyloucitSaldo",
        storno: Bool = "storno",
        zaokr_jak_sum_k: Text = "zaokrJakSumK",
        zaokr_na_sum_k: Text = "zaokrNaSumK",
        zaokr_jak_dph_k: Text = "zaokrJakDphK",
        zaokr_na_dph_k: Text = "zaokrNaDphK",
        metoda_zaokr_dokl_k: Text = "metodaZaokrDoklK",
        vytvaret_kor_pol: Bool = "vytvaretKorPol",
        stitky: Text = "stitky",
        typ_dokl: Text = "typDokl",
        mena: Text = "mena",
        kon_sym: Text = "konSym",
        firma: Text = "firma",
        stat: Text = "stat",
        fa_stat: Text = "faStat",
        region: Text = "region",
        fa_region: Text = "faRegion",
        mist_urc: Text = "mistUrc",
        ban_spoj_dod: Text = "banSpojDod",
        bankovni_ucet: Text = "bankovniUcet",
        typ_dokl_ban: Text = "typDoklBan",
        typ_uc_op: Text = "typUcOp",
        prim_ucet: Text = "primUcet",
        proti_ucet: Text = "protiUcet",
        dph_zakl_ucet: Text = "dphZaklUcet",
        dph_sniz_ucet: Text = "dphSnizUcet",
        dph_sniz2_ucet: Text = "dphSniz2Ucet",
        smer_kod: Text = "smerKod",
        stat_dph: Text = "statDph",
        clen_dph: Text = "clenDph",
        stredisko: Text = "stredisko",
        cinnost: Text = "cinnost",
        zakazka: Text = "zakazka",
        uzivatel: Text = "uzivatel",
        zodp_osoba: Text = "zodpOsoba",
        kontakt_osoba: Text = "kontaktOsoba",
        kontakt_jmeno: Text = "kontaktJmeno",
        kontakt_email: Text = "kontaktEmail",
        kontakt_tel: Text = "kontaktTel",
        rada: Text = "rada",
        forma_dopravy: Text = "formaDopravy",
        uuid: Text = "uuid",
        source: Text = "source",
        clen_kon_vyk_dph: Text = "clenKonVykDph",
        dat_up1: Date = "datUp1",
        dat_up2: Date = "datUp2",
        dat_smir: Date = "datSmir",
        dat_penale: Date = "datPenale",
        podpis_prik: Bool = "podpisPrik",
        prikaz_sum: Float = "prikazSum",
        prikaz_sum_men: Float = "prikazSumMen",
        juh_sum: Float = "juhSum",
        juh_sum_men: Float = "juhSumMen",
        juh_dat: Float = "juhDat",
        juh_dat_men: Float = "juhDatMen",
        zbyva_uhradit: Float = "zbyvaUhradit",
        zbyva_uhradit_men: Float = "zbyvaUhraditMen",
        forma_uhrady_cis: Text = "formaUhradyCis",
        stav_uhr_k: Text = "stavUhrK",
        juh_sum_pp: Float = "juhSumPp",
        juh_sum_pp_men: Float = "juhSumPpMen",
        sum_prepl: Float = "sumPrepl",
        sum_prepl_men: Float = "sumPreplMen",
        sum_zalohy: Float = "sumZalohy",
        sum_zalohy_men: Float = "sumZalohyMen",
        stav_odpocet_k: Text = "stavOdpocetK",
        generovat_skl: Bool = "generovatSkl",
        zaokrouhlit_po_odpoctu: Bool = "zaokrouhlitPoOdpoctu",
        hrom_fakt: Bool = "hromFakt",
        zdroj_pro_skl: Text = "zdrojProSkl",
        prodejka: Bool = "prodejka",
        stav_mail_k: Text = "stavMailK",
        dobropisovano: Bool = "dobropisovano",
        sum_celkem_bez_zaloh: Float = "sumCelkemBezZaloh",
        sum_celkem_bez_zaloh_men: Float = "sumCelkemBezZalohMen",
        odpoc_auto: Bool = "odpocAuto",
        cis_obj: Text = "cisObj",
        var_sym: Text = "varSym",
    }
}

abra_record! {
    /// Scalar fields of one `polozkyFaktury` line.
    pub struct ItemDetail {
        last_update: Date = "lastUpdate",
        kod: Text = "kod",
        ean_kod: Text = "eanKod",
        nazev: Text = "nazev",
        nazev_a: Text = "nazevA",
        nazev_b: Text = "nazevB",
        nazev_c: Text = "nazevC",
        cis_rad: Float = "cisRad",
        typ_polozky_k: Text = "typPolozkyK",
        baleni_id: Float = "baleniId",
        mnoz_baleni: Float = "mnozBaleni",
        mnoz_mj: Float = "mnozMj",
        typ_ceny_dph_k: Text = "typCenyDphK",
        typ_szb_dph_k: Text = "typSzbDphK",
        szb_dph: Float = "szbDph",
        cena_mj: Float = "cenaMj",
        sleva_pol: Float = "slevaPol",
        upl_sleva_dokl: Bool = "uplSlevaDokl",
        sum_zkl: Float = "sumZkl",
        sum_dph: Float = "sumDph",
        sum_celkem: Float = "sumCelkem",
        sum_zkl_men: Float = "sumZklMen",
        sum_dph_men: Float = "sumDphMen",
        sum_celkem_men: Float = "sumCelkemMen",
        objem: Float = "objem",
        cen_jednotka: Float = "cenJednotka",
        typ_vyp_ceny_k: Text = "typVypCenyK",
        cena_mj_nakup: Float = "cenaMjNakup",
        cena_mj_prodej: Float = "cenaMjProdej",
        cena_mj_cenik_tuz: Float = "cenaMjCenikTuz",
        proc_zakl: Float = "procZakl",
        sleva_mnoz: Float = "slevaMnoz",
        zaokr_jak_k: Text = "zaokrJakK",
        zaokr_na_k: Text = "zaokrNaK",
        sarze: Text = "sarze",
        expirace: Date = "expirace",
        dat_trvan: Date = "datTrvan",
        dat_vyroby: Date = "datVyroby",
        stav_uziv_k: Text = "stavUzivK",
        mnoz_mj_plan: Float = "mnozMjPlan",
        mnoz_mj_real: Float = "mnozMjReal",
        auto_zaokr: Bool = "autoZaokr",
        autogen: Bool = "autogen",
        poznam: Text = "poznam",
        sleva_dokl: Float = "slevaDokl",
        dat_vyst: Date = "datVyst",
        kop_zkl_md_ucet: Bool = "kopZklMdUcet",
        kop_zkl_dal_ucet: Bool = "kopZklDalUcet",
        kop_dph_md_ucet: Bool = "kopDphMdUcet",
        kop_dph_dal_ucet: Bool = "kopDphDalUcet",
        kop_typ_uc_op: Bool = "kopTypUcOp",
        kop_zakazku: Bool = "kopZakazku",
        kop_stred: Bool = "kopStred",
        kop_cinnost: Bool = "kopCinnost",
        kop_klice: Bool = "kopKlice",
        kop_clen_dph: Bool = "kopClenDph",
        kop_dat_ucto: Bool = "kopDatUcto",
        dat_ucto: Date = "datUcto",
        storno: Bool = "storno",
        storno_pol: Bool = "stornoPol",
        sklad: Text = "sklad",
        stredisko: Text = "stredisko",
        cinnost: Text = "cinnost",
        mena: Text = "mena",
        typ_uc_op: Text = "typUcOp",
        zkl_md_ucet: Text = "zklMdUcet",
        zkl_dal_ucet: Text = "zklDalUcet",
        dph_md_ucet: Text = "dphMdUcet",
        dph_dal_ucet: Text = "dphDalUcet",
        zakazka: Text = "zakazka",
        dodavatel: Text = "dodavatel",
        clen_dph: Text = "clenDph",
        dph_pren: Text = "dphPren",
        cenik: Text = "cenik",
        cen_hlad: Text = "cenHlad",
        mj: Text = "mj",
        mj_objem: Text = "mjObjem",
        sazba_dph: Text = "sazbaDph",
        sazba_dph_puv: Text = "sazbaDphPuv",
        vyrobni_cisla_ok: Bool = "vyrobniCislaOk",
        id_pol_obch_zdroj: Text = "idPolObchZdroj",
        skup_plneni: Text = "skupPlneni",
        stitky: Text = "stitky",
        source: Text = "source",
        clen_kon_vyk_dph: Text = "clenKonVykDph",
        kop_clen_kon_vyk_dph: Bool = "kopClenKonVykDph",
        ciselny_kod_zbozi: Text = "ciselnyKodZbozi",
        druh_zbozi: Text = "druhZbozi",
        dokl_fak: Text = "doklFak",
        poplatek_parent_pol_fak: Text = "poplatekParentPolFak",
        zdroj_pro_skl: Text = "zdrojProSkl",
        zaloha: Bool = "zaloha",
        prodejka: Bool = "prodejka",
        vyrobni_cisla_prijata: Text = "vyrobniCislaPrijata",
        vyrobni_cisla_vydana: Text = "vyrobniCislaVydana",
    }
}

/// One issued invoice as exported by Abra Flexi.
///
/// `ext_id` and `id` are the prefix-stripped `ext:` and `key:` identifiers;
/// together they form the natural key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbraInvoice {
    pub ext_id: Option<String>,
    pub id: Option<String>,
    pub header: InvoiceHeader,
    pub items: Vec<AbraInvoiceItem>,
}

impl AbraInvoice {
    /// Display form of the natural key, e.g. `(ext:FV-1, key:12)`.
    pub fn natural_key(&self) -> String {
        render_key(self.ext_id.as_deref(), self.id.as_deref())
    }
}

/// One invoice line, keyed by `(ext_kod, ext_kod_k)` from `ext:<code>-<seq>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbraInvoiceItem {
    pub ext_kod: String,
    pub ext_kod_k: i64,
    pub id: Option<String>,
    pub detail: ItemDetail,
}

impl AbraInvoiceItem {
    /// Display form of the item key, e.g. `ext:ABC-7`.
    pub fn natural_key(&self) -> String {
        format!("ext:{}-{}", self.ext_kod, self.ext_kod_k)
    }
}

pub(crate) fn render_key(ext_id: Option<&str>, id: Option<&str>) -> String {
    let ext = ext_id.map(|e| format!("ext:{e}"));
    let key = id.map(|k| format!("key:{k}"));
    match (ext, key) {
        (Some(e), Some(k)) => format!("({e}, {k})"),
        (Some(one), None) | (None, Some(one)) => format!("({one})"),
        (None, None) => "(no key)".to_string(),
    }
}
